use std::collections::VecDeque;

use academy_core::{
    AdminError, BatchProgress, BatchReport, BulkDeleteCoordinator, CatalogRow, ConfirmPrompt,
    SelectionTracker, TableId, TableRefresher,
};
use tracing::{info, warn};

use super::loader::TableLoader;

/// Statistics tracked during the session
#[derive(Debug, Default, Clone)]
pub struct SessionStats {
    /// Number of items deleted
    pub items_deleted: u32,
    /// Number of deletes that failed
    pub items_failed: u32,
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing a table (or the lessons popup)
    Browsing,
    /// Showing help overlay
    Help,
    /// Showing a delete confirmation dialog
    Confirm,
    /// Delete batch in progress with progress overlay
    Deleting,
    /// Showing a message box
    Message,
}

/// Per-table cursor state
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected_index: usize,
    pub scroll_offset: usize,
}

/// Rows and cursor of one table
#[derive(Debug, Default)]
pub struct TableData {
    pub rows: Vec<CatalogRow>,
    pub view: ViewState,
    /// Whether the table has been fetched at least once
    pub loaded: bool,
    pub error: Option<String>,
}

/// The lessons popup opened from a series or school
#[derive(Debug, Clone)]
pub struct ModalState {
    pub title: String,
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Active tab
    pub tab: TableId,
    /// Lessons popup, when open
    pub modal: Option<ModalState>,
    /// Rows per table, indexed by `TableId::index`
    pub tables: [TableData; 4],
    /// Checked rows
    pub tracker: SelectionTracker,
    /// Runs bulk and single deletes
    pub coordinator: BulkDeleteCoordinator,
    /// Background table fetches
    pub loader: TableLoader,
    /// Confirmation currently shown
    pub prompt: Option<ConfirmPrompt>,
    /// Table whose progress overlay is shown
    pub progress_table: Option<TableId>,
    /// Messages waiting to be shown, oldest first
    pub messages: VecDeque<String>,
    /// Session statistics
    pub session_stats: SessionStats,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(coordinator: BulkDeleteCoordinator, loader: TableLoader) -> Self {
        Self {
            mode: AppMode::Browsing,
            tab: TableId::Lessons,
            modal: None,
            tables: Default::default(),
            tracker: SelectionTracker::new(),
            coordinator,
            loader,
            prompt: None,
            progress_table: None,
            messages: VecDeque::new(),
            session_stats: SessionStats::default(),
            visible_height: 20,
            should_quit: false,
            spinner_frame: 0,
        }
    }

    /// Table the cursor keys act on
    pub fn active_table(&self) -> TableId {
        if self.modal.is_some() {
            TableId::Modal
        } else {
            self.tab
        }
    }

    pub fn table(&self, table: TableId) -> &TableData {
        &self.tables[table.index()]
    }

    fn table_mut(&mut self, table: TableId) -> &mut TableData {
        &mut self.tables[table.index()]
    }

    /// Row under the cursor in the active table
    pub fn current_row(&self) -> Option<&CatalogRow> {
        let data = self.table(self.active_table());
        data.rows.get(data.view.selected_index)
    }

    /// Advance spinner animation
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- Loading ---

    /// Fetch every tab's contents
    pub fn load_all(&mut self) {
        for table in TableId::TABS {
            self.loader.refresh(table);
        }
    }

    /// Reload the active table. Selection is reset, as after any refresh.
    pub fn refresh_active(&mut self) {
        self.tracker.clear();
        self.loader.refresh(self.active_table());
    }

    /// Apply finished background loads
    pub fn poll_loads(&mut self) {
        for result in self.loader.poll() {
            match result.rows {
                Ok(rows) => self.apply_rows(result.table, rows),
                Err(e) => {
                    let data = self.table_mut(result.table);
                    data.error = Some(e);
                    data.loaded = true;
                }
            }
        }
    }

    /// Replace a table's rows, keeping the cursor in range
    pub fn apply_rows(&mut self, table: TableId, rows: Vec<CatalogRow>) {
        let vh = self.visible_height;
        let data = self.table_mut(table);
        data.rows = rows;
        data.loaded = true;
        data.error = None;
        let count = data.rows.len();
        if data.view.selected_index >= count {
            data.view.selected_index = count.saturating_sub(1);
        }
        if data.view.scroll_offset > data.view.selected_index {
            data.view.scroll_offset = data.view.selected_index;
        }
        Self::ensure_visible_for(
            &mut data.view.selected_index,
            &mut data.view.scroll_offset,
            vh,
        );
    }

    // --- Navigation ---

    fn active_view_mut(&mut self) -> (&mut ViewState, usize) {
        let table = self.active_table();
        let data = self.table_mut(table);
        let count = data.rows.len();
        (&mut data.view, count)
    }

    /// Ensure the given index is visible within the scroll viewport
    fn ensure_visible_for(selected: &mut usize, scroll: &mut usize, visible_height: usize) {
        if *selected < *scroll {
            *scroll = *selected;
        } else if visible_height > 0 && *selected >= *scroll + visible_height {
            *scroll = *selected - visible_height + 1;
        }
    }

    pub fn move_up(&mut self) {
        let vh = self.visible_height;
        let (view, _) = self.active_view_mut();
        if view.selected_index > 0 {
            view.selected_index -= 1;
        }
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    pub fn move_down(&mut self) {
        let vh = self.visible_height;
        let (view, count) = self.active_view_mut();
        if view.selected_index < count.saturating_sub(1) {
            view.selected_index += 1;
        }
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    pub fn page_up(&mut self) {
        let vh = self.visible_height;
        let page_size = vh.saturating_sub(2).max(1);
        let (view, _) = self.active_view_mut();
        view.selected_index = view.selected_index.saturating_sub(page_size);
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    pub fn page_down(&mut self) {
        let vh = self.visible_height;
        let page_size = vh.saturating_sub(2).max(1);
        let (view, count) = self.active_view_mut();
        view.selected_index = (view.selected_index + page_size).min(count.saturating_sub(1));
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    pub fn go_to_first(&mut self) {
        let vh = self.visible_height;
        let (view, _) = self.active_view_mut();
        view.selected_index = 0;
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    pub fn go_to_last(&mut self) {
        let vh = self.visible_height;
        let (view, count) = self.active_view_mut();
        view.selected_index = count.saturating_sub(1);
        Self::ensure_visible_for(&mut view.selected_index, &mut view.scroll_offset, vh);
    }

    /// Switch to next tab (ignored while the popup is open)
    pub fn next_table(&mut self) {
        if self.modal.is_none() {
            self.tab = self.tab.next_tab();
        }
    }

    /// Switch to previous tab (ignored while the popup is open)
    pub fn prev_table(&mut self) {
        if self.modal.is_none() {
            self.tab = self.tab.prev_tab();
        }
    }

    // --- Selection ---

    /// Check or uncheck the row under the cursor
    pub fn toggle_check(&mut self) {
        let table = self.active_table();
        let Some(item) = self
            .current_row()
            .and_then(|row| row.to_selected_item(table))
        else {
            return;
        };
        let checked = !self.tracker.is_selected(table, item.item_id);
        self.tracker.toggle(item, checked);
    }

    /// Uncheck everything in every table
    pub fn select_none(&mut self) {
        self.tracker.clear();
    }

    // --- Lessons popup ---

    /// Open the lessons of the series or school under the cursor
    pub fn view_lessons(&mut self) {
        if self.modal.is_some() {
            return;
        }
        let Some(row) = self.current_row() else {
            return;
        };
        let Some(link) = row.view_lessons_link().map(str::to_string) else {
            return;
        };
        let title = format!("Lessons in {}", row.display_name());

        self.tracker.clear_table(TableId::Modal);
        *self.table_mut(TableId::Modal) = TableData::default();
        self.loader.set_modal_link(Some(link));
        self.loader.refresh(TableId::Modal);
        self.modal = Some(ModalState { title });
    }

    /// Close the lessons popup and drop its selection
    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.tracker.clear_table(TableId::Modal);
            *self.table_mut(TableId::Modal) = TableData::default();
            self.loader.set_modal_link(None);
        }
    }

    // --- Deleting ---

    /// Ask to delete: the checked rows if the table has any, else the row under the cursor
    pub fn request_delete(&mut self) {
        let table = self.active_table();

        let result = if self.tracker.affordance(table).is_shown() {
            self.coordinator.request(table, &self.tracker)
        } else {
            let Some(row) = self.current_row() else {
                return;
            };
            match row.to_selected_item(table) {
                Some(item) => self.coordinator.request_single(item),
                None => Err(AdminError::HasLessons(row.display_name().to_string())),
            }
        };

        match result {
            Ok(prompt) => {
                self.prompt = Some(prompt);
                self.mode = AppMode::Confirm;
            }
            Err(e) => self.show_message(e.to_string()),
        }
    }

    /// Start the delete shown in the confirmation dialog
    pub fn confirm_delete(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            self.mode = AppMode::Browsing;
            return;
        };
        match self.coordinator.confirm(prompt.table, &self.tracker) {
            Ok(_) => {
                self.progress_table = Some(prompt.table);
                self.mode = AppMode::Deleting;
            }
            Err(e) => {
                self.mode = AppMode::Browsing;
                self.show_message(e.to_string());
            }
        }
    }

    /// Decline the delete shown in the confirmation dialog
    pub fn cancel_delete(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            if let Err(e) = self.coordinator.cancel(prompt.table, &mut self.tracker) {
                warn!(table = %prompt.table, error = %e, "cancel without pending confirmation");
            }
        }
        self.mode = AppMode::Browsing;
        self.show_pending_message();
    }

    /// Hide the progress overlay; the batch keeps running
    pub fn hide_progress(&mut self) {
        self.progress_table = None;
        self.mode = AppMode::Browsing;
        self.show_pending_message();
    }

    /// Counters of the batch whose progress is shown
    pub fn shown_progress(&self) -> Option<(TableId, BatchProgress)> {
        let table = self.progress_table?;
        self.coordinator
            .progress(table)
            .map(|progress| (table, progress))
    }

    /// Reconcile finished delete batches
    pub fn poll_deletes(&mut self) {
        let reports = self.coordinator.poll(&mut self.tracker, &mut self.loader);
        for report in reports {
            self.apply_report(report);
        }
    }

    fn apply_report(&mut self, report: BatchReport) {
        info!(
            table = %report.table,
            deleted = report.deleted(),
            failed = report.failed,
            "delete reported"
        );
        self.session_stats.items_deleted += report.deleted() as u32;
        self.session_stats.items_failed += report.failed as u32;

        if self.progress_table == Some(report.table) {
            self.progress_table = None;
            self.mode = AppMode::Browsing;
        }
        self.show_message(report.message);
    }

    // --- Messages ---

    /// Queue a message; it is shown as soon as no dialog is open
    pub fn show_message(&mut self, message: String) {
        self.messages.push_back(message);
        self.show_pending_message();
    }

    fn show_pending_message(&mut self) {
        if self.mode == AppMode::Browsing && !self.messages.is_empty() {
            self.mode = AppMode::Message;
        }
    }

    pub fn current_message(&self) -> Option<&str> {
        self.messages.front().map(String::as_str)
    }

    pub fn dismiss_message(&mut self) {
        self.messages.pop_front();
        self.mode = if self.messages.is_empty() {
            AppMode::Browsing
        } else {
            AppMode::Message
        };
    }

    // --- Help ---

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn hide_help(&mut self) {
        self.mode = AppMode::Browsing;
        self.show_pending_message();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use academy_core::{
        AdminClient, AdminConfig, DeleteClient, DeleteOutcome, Lesson, School, SelectedItem,
        Series,
    };

    use super::*;

    /// Fails every delete whose id is in the list
    struct ScriptedClient {
        failing: Vec<u64>,
    }

    impl DeleteClient for ScriptedClient {
        fn delete(&self, item: &SelectedItem) -> DeleteOutcome {
            if self.failing.contains(&item.item_id) {
                DeleteOutcome::Refused { reason: None }
            } else {
                DeleteOutcome::Deleted
            }
        }
    }

    fn state_with(failing: Vec<u64>) -> AppState {
        let config = AdminConfig {
            lessons_url: "http://127.0.0.1:9/lessons".into(),
            schools_url: "http://127.0.0.1:9/schools".into(),
            series_url: "http://127.0.0.1:9/series".into(),
            token: "t".into(),
            request_timeout: Duration::from_millis(200),
            batch_grace: Duration::from_millis(200),
        };
        let client = Arc::new(AdminClient::new("t", config.request_timeout).unwrap());
        let loader = TableLoader::new(client, config);
        let coordinator = BulkDeleteCoordinator::new(
            Arc::new(ScriptedClient { failing }),
            Duration::from_secs(5),
        );
        AppState::new(coordinator, loader)
    }

    fn lesson(id: u64) -> CatalogRow {
        CatalogRow::Lesson(Lesson {
            id,
            title: format!("Lesson {}", id),
            published: true,
            date: "2015-01-01".into(),
            category_name: "North".into(),
            series_name: String::new(),
            true_position: None,
            edit_link: String::new(),
            delete_link: "/delete/lesson".into(),
        })
    }

    fn school(id: u64, lesson_count: u32) -> CatalogRow {
        CatalogRow::School(School {
            id,
            name: format!("School {}", id),
            lesson_count,
            view_lessons_link: format!("http://127.0.0.1:9/lessons?school={}", id),
            edit_link: String::new(),
            delete_link: "/delete/school".into(),
        })
    }

    fn series(id: u64) -> CatalogRow {
        CatalogRow::Series(Series {
            id,
            series_name: format!("Series {}", id),
            lesson_count: 2,
            view_lessons_link: format!("http://127.0.0.1:9/lessons?series={}", id),
            edit_link: String::new(),
            delete_link: "/delete/series".into(),
        })
    }

    fn wait_for_report(state: &mut AppState) {
        let start = Instant::now();
        while state.coordinator.is_busy() {
            state.poll_deletes();
            assert!(
                start.elapsed() < Duration::from_secs(5),
                "delete never finished"
            );
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_navigation_clamps() {
        let mut state = state_with(vec![]);
        state.apply_rows(TableId::Lessons, (1..=3).map(lesson).collect());
        state.move_up();
        assert_eq!(state.table(TableId::Lessons).view.selected_index, 0);
        state.go_to_last();
        state.move_down();
        assert_eq!(state.table(TableId::Lessons).view.selected_index, 2);

        // Shrinking the table pulls the cursor back in range
        state.apply_rows(TableId::Lessons, vec![lesson(1)]);
        assert_eq!(state.table(TableId::Lessons).view.selected_index, 0);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut state = state_with(vec![]);
        state.visible_height = 3;
        state.apply_rows(TableId::Lessons, (1..=10).map(lesson).collect());
        for _ in 0..5 {
            state.move_down();
        }
        let view = &state.table(TableId::Lessons).view;
        assert_eq!(view.selected_index, 5);
        assert_eq!(view.scroll_offset, 3);
    }

    #[test]
    fn test_toggle_check_shows_affordance() {
        let mut state = state_with(vec![]);
        state.apply_rows(TableId::Lessons, vec![lesson(1), lesson(2)]);
        state.toggle_check();
        assert!(state.tracker.affordance(TableId::Lessons).is_shown());
        state.toggle_check();
        assert!(!state.tracker.affordance(TableId::Lessons).is_shown());
    }

    #[test]
    fn test_blocked_school_cannot_be_checked_or_deleted() {
        let mut state = state_with(vec![]);
        state.tab = TableId::Schools;
        state.apply_rows(TableId::Schools, vec![school(1, 4)]);
        state.toggle_check();
        assert!(state.tracker.is_empty());

        state.request_delete();
        assert_eq!(state.mode, AppMode::Message);
        assert_eq!(
            state.current_message(),
            Some("School 1 has lessons and cannot be deleted")
        );
        assert!(state.prompt.is_none());
    }

    #[test]
    fn test_cancel_after_slot_is_gone_returns_to_browsing() {
        let mut state = state_with(vec![]);
        state.apply_rows(TableId::Lessons, vec![lesson(1)]);
        state.request_delete();
        assert_eq!(state.mode, AppMode::Confirm);

        // The coordinator no longer holds the confirmation
        state
            .coordinator
            .cancel(TableId::Lessons, &mut state.tracker)
            .unwrap();

        state.cancel_delete();
        assert_eq!(state.mode, AppMode::Browsing);
        assert!(state.prompt.is_none());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_bulk_delete_flow() {
        let mut state = state_with(vec![2]);
        state.apply_rows(TableId::Lessons, (1..=3).map(lesson).collect());
        state.toggle_check();
        state.move_down();
        state.toggle_check();

        state.request_delete();
        assert_eq!(state.mode, AppMode::Confirm);
        assert_eq!(state.prompt.as_ref().unwrap().entries.len(), 2);

        state.confirm_delete();
        assert_eq!(state.mode, AppMode::Deleting);
        wait_for_report(&mut state);

        assert_eq!(state.mode, AppMode::Message);
        assert_eq!(
            state.current_message(),
            Some(academy_core::coordinator::BULK_FAILURE_MESSAGE)
        );
        assert_eq!(state.session_stats.items_deleted, 1);
        assert_eq!(state.session_stats.items_failed, 1);
        assert!(state.tracker.is_empty());

        state.dismiss_message();
        assert_eq!(state.mode, AppMode::Browsing);
    }

    #[test]
    fn test_single_delete_uses_cursor_row() {
        let mut state = state_with(vec![]);
        state.apply_rows(TableId::Lessons, vec![lesson(7)]);
        state.request_delete();
        let prompt = state.prompt.as_ref().unwrap();
        assert_eq!(prompt.entries, vec![("Lesson 7".to_string(), 7)]);

        state.confirm_delete();
        wait_for_report(&mut state);
        assert_eq!(
            state.current_message(),
            Some("The lesson was successfully deleted.")
        );
    }

    #[test]
    fn test_cancel_clears_table_selection() {
        let mut state = state_with(vec![]);
        state.apply_rows(TableId::Lessons, vec![lesson(1)]);
        state.toggle_check();
        state.request_delete();
        state.cancel_delete();
        assert_eq!(state.mode, AppMode::Browsing);
        assert!(state.tracker.is_empty());
        assert_eq!(state.coordinator.requests_issued(), 0);
    }

    #[test]
    fn test_modal_selection_is_separate_and_dropped_on_close() {
        let mut state = state_with(vec![]);
        state.tab = TableId::Series;
        state.apply_rows(TableId::Series, vec![series(3)]);
        state.toggle_check();

        state.view_lessons();
        assert_eq!(state.active_table(), TableId::Modal);
        assert_eq!(state.modal.as_ref().unwrap().title, "Lessons in Series 3");
        state.apply_rows(TableId::Modal, vec![lesson(1), lesson(2)]);
        state.toggle_check();
        assert_eq!(state.tracker.count_in(TableId::Modal), 1);
        assert_eq!(state.tracker.count_in(TableId::Series), 1);

        // Tabs don't switch under the popup
        state.next_table();
        assert_eq!(state.tab, TableId::Series);

        state.close_modal();
        assert_eq!(state.active_table(), TableId::Series);
        assert_eq!(state.tracker.count_in(TableId::Modal), 0);
        assert_eq!(state.tracker.count_in(TableId::Series), 1);
        assert!(state.table(TableId::Modal).rows.is_empty());
    }

    #[test]
    fn test_messages_wait_for_dialogs() {
        let mut state = state_with(vec![]);
        state.show_help();
        state.show_message("first".into());
        assert_eq!(state.mode, AppMode::Help);
        state.hide_help();
        assert_eq!(state.mode, AppMode::Message);

        state.show_message("second".into());
        state.dismiss_message();
        assert_eq!(state.current_message(), Some("second"));
        assert_eq!(state.mode, AppMode::Message);
        state.dismiss_message();
        assert_eq!(state.mode, AppMode::Browsing);
    }
}
