use std::sync::Arc;

use academy_core::{AdminClient, AdminConfig, CatalogRow, TableId, TableRefresher};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

/// Result of one background table fetch
pub struct LoadResult {
    pub table: TableId,
    pub generation: u64,
    pub rows: Result<Vec<CatalogRow>, String>,
}

/// Fetches table contents on background threads.
///
/// Every refresh bumps the table's generation; results from older
/// generations are dropped so a slow response never overwrites a newer one.
pub struct TableLoader {
    client: Arc<AdminClient>,
    config: AdminConfig,
    modal_link: Option<String>,
    generations: [u64; 4],
    pending: [bool; 4],
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl TableLoader {
    pub fn new(client: Arc<AdminClient>, config: AdminConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            client,
            config,
            modal_link: None,
            generations: [0; 4],
            pending: [false; 4],
            tx,
            rx,
        }
    }

    /// Point the modal table at a series' or school's lesson list
    pub fn set_modal_link(&mut self, link: Option<String>) {
        self.modal_link = link;
        // Anything still loading belongs to the previous popup
        self.generations[TableId::Modal.index()] += 1;
        self.pending[TableId::Modal.index()] = false;
    }

    pub fn is_loading(&self, table: TableId) -> bool {
        self.pending[table.index()]
    }

    pub fn any_loading(&self) -> bool {
        self.pending.iter().any(|p| *p)
    }

    /// Collect finished fetches that are still current
    pub fn poll(&mut self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            let idx = result.table.index();
            if result.generation != self.generations[idx] {
                debug!(table = %result.table, "dropping stale table load");
                continue;
            }
            self.pending[idx] = false;
            results.push(result);
        }
        results
    }

    fn url_for(&self, table: TableId) -> Option<String> {
        match table {
            TableId::Modal => self.modal_link.clone(),
            _ => self.config.list_url(table).map(str::to_string),
        }
    }
}

impl TableRefresher for TableLoader {
    fn refresh(&mut self, table: TableId) {
        let Some(url) = self.url_for(table) else {
            debug!(%table, "nothing to refresh");
            return;
        };

        let idx = table.index();
        self.generations[idx] += 1;
        self.pending[idx] = true;
        let generation = self.generations[idx];

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let rows = client.fetch_rows(table, &url).map_err(|e| {
                warn!(%table, error = %e, "table load failed");
                e.to_string()
            });
            let _ = tx.send(LoadResult {
                table,
                generation,
                rows,
            });
        });
    }
}
