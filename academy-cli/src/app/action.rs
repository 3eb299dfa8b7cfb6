/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up
    MoveUp,
    /// Move cursor down
    MoveDown,
    /// Move cursor up by a page
    PageUp,
    /// Move cursor down by a page
    PageDown,
    /// Go to first row
    GoToFirst,
    /// Go to last row
    GoToLast,
    /// Switch to the next table tab
    NextTable,
    /// Switch to the previous table tab
    PrevTable,
    /// Check or uncheck the row under the cursor
    ToggleCheck,
    /// Uncheck everything
    SelectNone,
    /// Delete the checked rows, or the row under the cursor
    Delete,
    /// Open the lessons of the series/school under the cursor
    ViewLessons,
    /// Reload the active table
    Refresh,
    /// Close the lessons popup
    CloseModal,
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Confirm the pending delete
    ConfirmDelete,
    /// Decline the pending delete
    CancelDelete,
    /// Hide the delete progress overlay (deletes keep running)
    HideProgress,
    /// Dismiss the message box
    DismissMessage,
    /// Quit application
    Quit,
    /// No-op tick
    Tick,
}
