use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::batch::{BatchProgress, BatchState, DeleteBatch};
use crate::client::DeleteClient;
use crate::error::{AdminError, Result};
use crate::selection::{SelectedItem, SelectionTracker};
use crate::table::TableId;

pub const BULK_SUCCESS_MESSAGE: &str = "All items have been deleted.";
pub const BULK_FAILURE_MESSAGE: &str =
    "There was an error with the deletion. Not all may have been deleted.";

/// Re-fetches and re-renders a table's contents
pub trait TableRefresher {
    fn refresh(&mut self, table: TableId);
}

/// What the confirmation dialog shows for a pending delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub table: TableId,
    pub title: String,
    pub body: String,
    /// `(display_name, item_id)` of every item that would be deleted
    pub entries: Vec<(String, u64)>,
}

/// Final result of a batch, produced once all of its responses are in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub table: TableId,
    pub expected: usize,
    pub failed: usize,
    pub single: bool,
    /// Operator-facing message
    pub message: String,
    /// Detail of the first failure, for the log
    pub first_failure: Option<String>,
}

impl BatchReport {
    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn deleted(&self) -> usize {
        self.expected - self.failed
    }
}

enum PendingTarget {
    /// Whatever is selected in the table when the operator confirms
    Selection,
    Single(SelectedItem),
}

enum Slot {
    Confirming(PendingTarget),
    InFlight(DeleteBatch),
}

/// Runs confirm → fan-out → fan-in → report for each table.
///
/// Each table has at most one slot, so a second batch for a table that is
/// still in flight is refused while other tables proceed independently.
pub struct BulkDeleteCoordinator {
    client: Arc<dyn DeleteClient>,
    batch_deadline: Duration,
    slots: HashMap<TableId, Slot>,
    requests_issued: usize,
}

impl BulkDeleteCoordinator {
    pub fn new(client: Arc<dyn DeleteClient>, batch_deadline: Duration) -> Self {
        Self {
            client,
            batch_deadline,
            slots: HashMap::new(),
            requests_issued: 0,
        }
    }

    /// Open the confirmation for deleting a table's selected items
    pub fn request(&mut self, table: TableId, tracker: &SelectionTracker) -> Result<ConfirmPrompt> {
        self.ensure_not_in_flight(table)?;

        let entries = tracker
            .partition(table)
            .into_iter()
            .map(|item| (item.display_name, item.item_id))
            .collect();
        self.slots
            .insert(table, Slot::Confirming(PendingTarget::Selection));

        Ok(ConfirmPrompt {
            table,
            title: "Delete all selected items?".to_string(),
            body: "Are you sure you want to delete these items? This cannot be undone.".to_string(),
            entries,
        })
    }

    /// Open the confirmation for deleting one row
    pub fn request_single(&mut self, item: SelectedItem) -> Result<ConfirmPrompt> {
        let table = item.table;
        self.ensure_not_in_flight(table)?;

        let noun = table.noun();
        let prompt = ConfirmPrompt {
            table,
            title: format!("Are you sure you want to delete this {}?", noun),
            body: format!(
                "Are you sure you want to delete {}? This action cannot be undone.",
                item.display_name
            ),
            entries: vec![(item.display_name.clone(), item.item_id)],
        };
        self.slots
            .insert(table, Slot::Confirming(PendingTarget::Single(item)));
        Ok(prompt)
    }

    /// Start deleting. Returns how many requests were issued.
    pub fn confirm(&mut self, table: TableId, tracker: &SelectionTracker) -> Result<usize> {
        self.ensure_not_in_flight(table)?;
        let target = match self.slots.remove(&table) {
            Some(Slot::Confirming(target)) => target,
            _ => return Err(AdminError::NoPendingConfirmation(table)),
        };

        let (items, single) = match target {
            PendingTarget::Selection => (tracker.partition(table), false),
            PendingTarget::Single(item) => (vec![item], true),
        };
        let expected = items.len();
        info!(%table, expected, single, "starting delete batch");

        let (tx, rx) = crossbeam_channel::unbounded();
        for (index, item) in items.iter().cloned().enumerate() {
            let tx = tx.clone();
            let client = Arc::clone(&self.client);
            std::thread::spawn(move || {
                let outcome = client.delete(&item);
                debug!(
                    table = %item.table,
                    item_id = item.item_id,
                    outcome = %outcome.describe(),
                    "delete answered"
                );
                let _ = tx.send((index, outcome));
            });
        }
        self.requests_issued += expected;

        let deadline = Instant::now() + self.batch_deadline;
        let batch = DeleteBatch::new(table, items, single, deadline, rx);
        self.slots.insert(table, Slot::InFlight(batch));
        Ok(expected)
    }

    /// Decline the pending confirmation for a table. The slot is freed and
    /// the terminal state returned.
    pub fn cancel(&mut self, table: TableId, tracker: &mut SelectionTracker) -> Result<BatchState> {
        self.ensure_not_in_flight(table)?;
        match self.slots.remove(&table) {
            Some(Slot::Confirming(PendingTarget::Selection)) => {
                debug!(%table, "bulk delete cancelled");
                tracker.clear_table(table);
                Ok(BatchState::Cancelled)
            }
            Some(Slot::Confirming(PendingTarget::Single(_))) => Ok(BatchState::Cancelled),
            _ => Err(AdminError::NoPendingConfirmation(table)),
        }
    }

    /// Collect responses and reconcile every batch whose responses are all in
    pub fn poll(
        &mut self,
        tracker: &mut SelectionTracker,
        refresher: &mut dyn TableRefresher,
    ) -> Vec<BatchReport> {
        let now = Instant::now();
        let mut finished: Vec<TableId> = Vec::new();

        for (table, slot) in self.slots.iter_mut() {
            if let Slot::InFlight(batch) = slot {
                batch.drain();
                let expired = batch.expire(now);
                if expired > 0 {
                    warn!(%table, expired, "delete requests timed out");
                }
                if batch.is_complete() {
                    batch.state = BatchState::Reconciling;
                    finished.push(*table);
                }
            }
        }
        finished.sort();

        let mut reports = Vec::with_capacity(finished.len());
        for table in finished {
            if let Some(Slot::InFlight(mut batch)) = self.slots.remove(&table) {
                let report = Self::reconcile(&batch);
                if report.succeeded() {
                    info!(%table, deleted = report.deleted(), "delete batch finished");
                } else {
                    warn!(
                        %table,
                        failed = report.failed,
                        expected = report.expected,
                        first = report.first_failure.as_deref().unwrap_or(""),
                        "delete batch finished with failures"
                    );
                }

                // Single deletes only refresh when the row is actually gone
                if !batch.single || report.succeeded() {
                    tracker.clear();
                    refresher.refresh(table);
                }
                batch.state = BatchState::Done;
                reports.push(report);
            }
        }
        reports
    }

    fn reconcile(batch: &DeleteBatch) -> BatchReport {
        let failed = batch.failures.len();
        let message = match (batch.single, batch.any_failed) {
            (false, false) => BULK_SUCCESS_MESSAGE.to_string(),
            (false, true) => BULK_FAILURE_MESSAGE.to_string(),
            (true, false) => format!("The {} was successfully deleted.", batch.table.noun()),
            (true, true) => format!("There was a problem deleting the {}.", batch.table.noun()),
        };
        let first_failure = batch.failures.first().map(|(index, outcome)| {
            let name = batch
                .items
                .get(*index)
                .map(|item| item.display_name.as_str())
                .unwrap_or("?");
            format!("{}: {}", name, outcome.describe())
        });
        BatchReport {
            table: batch.table,
            expected: batch.expected,
            failed,
            single: batch.single,
            message,
            first_failure,
        }
    }

    fn ensure_not_in_flight(&self, table: TableId) -> Result<()> {
        if matches!(self.slots.get(&table), Some(Slot::InFlight(_))) {
            return Err(AdminError::BatchInFlight(table));
        }
        Ok(())
    }

    pub fn state(&self, table: TableId) -> Option<BatchState> {
        self.slots.get(&table).map(|slot| match slot {
            Slot::Confirming(_) => BatchState::Confirming,
            Slot::InFlight(batch) => batch.state,
        })
    }

    /// Counters of a table's in-flight batch
    pub fn progress(&self, table: TableId) -> Option<BatchProgress> {
        match self.slots.get(&table) {
            Some(Slot::InFlight(batch)) => Some(batch.progress()),
            _ => None,
        }
    }

    /// Tables with a batch in flight, in table order
    pub fn in_flight_tables(&self) -> Vec<TableId> {
        let mut tables: Vec<TableId> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::InFlight(_)))
            .map(|(table, _)| *table)
            .collect();
        tables.sort();
        tables
    }

    pub fn is_busy(&self) -> bool {
        self.slots
            .values()
            .any(|slot| matches!(slot, Slot::InFlight(_)))
    }

    /// Total delete requests sent since the coordinator was created
    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }
}
