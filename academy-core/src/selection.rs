use crate::table::TableId;

/// One checked row pending deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    pub table: TableId,
    pub item_id: u64,
    /// Label shown in the confirmation list
    pub display_name: String,
    /// Where the delete request for this item is posted
    pub delete_endpoint: String,
}

impl SelectedItem {
    pub fn new(
        table: TableId,
        item_id: u64,
        display_name: impl Into<String>,
        delete_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            table,
            item_id,
            display_name: display_name.into(),
            delete_endpoint: delete_endpoint.into(),
        }
    }

    fn same_row(&self, table: TableId, item_id: u64) -> bool {
        self.table == table && self.item_id == item_id
    }
}

/// Visibility of a table's "delete selected" affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    Shown,
    #[default]
    Hidden,
}

impl Affordance {
    pub fn is_shown(&self) -> bool {
        matches!(self, Affordance::Shown)
    }
}

/// Tracks checked rows across all tables.
///
/// Entries are kept in the order they were checked. The stored affordances
/// only change in `evaluate`, which every mutating method calls before
/// returning, so readers never observe a stale "delete selected" state.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    items: Vec<SelectedItem>,
    affordances: [Affordance; 4],
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck a row. Both directions are idempotent.
    pub fn toggle(&mut self, item: SelectedItem, checked: bool) {
        if checked {
            if !self.is_selected(item.table, item.item_id) {
                self.items.push(item);
            }
        } else {
            self.items
                .retain(|existing| !existing.same_row(item.table, item.item_id));
        }
        self.evaluate();
    }

    /// Recompute the affordance of every known table from its partition
    pub fn evaluate(&mut self) -> [(TableId, Affordance); 4] {
        let mut counts = [0usize; 4];
        for item in &self.items {
            counts[item.table.index()] += 1;
        }

        TableId::ALL.map(|table| {
            let affordance = if counts[table.index()] > 0 {
                Affordance::Shown
            } else {
                Affordance::Hidden
            };
            self.affordances[table.index()] = affordance;
            (table, affordance)
        })
    }

    /// Deselect everything in every table
    pub fn clear(&mut self) {
        self.items.clear();
        self.evaluate();
    }

    /// Deselect everything in one table
    pub fn clear_table(&mut self, table: TableId) {
        self.items.retain(|item| item.table != table);
        self.evaluate();
    }

    pub fn affordance(&self, table: TableId) -> Affordance {
        self.affordances[table.index()]
    }

    pub fn is_selected(&self, table: TableId, item_id: u64) -> bool {
        self.items.iter().any(|item| item.same_row(table, item_id))
    }

    /// Selected items of one table, in selection order
    pub fn partition(&self, table: TableId) -> Vec<SelectedItem> {
        self.items
            .iter()
            .filter(|item| item.table == table)
            .cloned()
            .collect()
    }

    pub fn count_in(&self, table: TableId) -> usize {
        self.items.iter().filter(|item| item.table == table).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
