use std::fmt;

/// Identifies one of the independently rendered catalog tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableId {
    Lessons,
    Schools,
    Series,
    /// Lessons of a single series or school, shown in a popup
    Modal,
}

impl TableId {
    pub const ALL: [TableId; 4] = [
        TableId::Lessons,
        TableId::Schools,
        TableId::Series,
        TableId::Modal,
    ];

    /// Tables that have their own tab in the console
    pub const TABS: [TableId; 3] = [TableId::Lessons, TableId::Series, TableId::Schools];

    pub fn index(&self) -> usize {
        match self {
            TableId::Lessons => 0,
            TableId::Schools => 1,
            TableId::Series => 2,
            TableId::Modal => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableId::Lessons => "Lessons",
            TableId::Schools => "Schools",
            TableId::Series => "Series",
            TableId::Modal => "Lessons (popup)",
        }
    }

    /// What a single row of this table is called in prompts
    pub fn noun(&self) -> &'static str {
        match self {
            TableId::Lessons | TableId::Modal => "lesson",
            TableId::Schools => "school",
            TableId::Series => "series",
        }
    }

    pub fn next_tab(&self) -> Self {
        match self {
            TableId::Lessons => TableId::Series,
            TableId::Series => TableId::Schools,
            TableId::Schools | TableId::Modal => TableId::Lessons,
        }
    }

    pub fn prev_tab(&self) -> Self {
        match self {
            TableId::Lessons | TableId::Modal => TableId::Schools,
            TableId::Series => TableId::Lessons,
            TableId::Schools => TableId::Series,
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_distinct() {
        let mut seen = [false; 4];
        for table in TableId::ALL {
            assert!(!seen[table.index()]);
            seen[table.index()] = true;
        }
    }

    #[test]
    fn test_tab_cycle_skips_modal() {
        let mut table = TableId::Lessons;
        for _ in 0..6 {
            table = table.next_tab();
            assert_ne!(table, TableId::Modal);
        }
        assert_eq!(TableId::Lessons.next_tab().prev_tab(), TableId::Lessons);
        assert_eq!(TableId::Modal.next_tab(), TableId::Lessons);
    }
}
