use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, AppMode};

/// Map key events to actions based on current mode
pub fn handle_key(key: KeyEvent, mode: AppMode, modal_open: bool) -> Action {
    match mode {
        AppMode::Help => handle_key_help(key),
        AppMode::Confirm => handle_key_confirm(key),
        AppMode::Deleting => handle_key_deleting(key),
        AppMode::Message => handle_key_message(key),
        AppMode::Browsing => handle_key_browsing(key, modal_open),
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_key_help(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::HideHelp,
        _ => Action::Tick,
    }
}

fn handle_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::ConfirmDelete,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::CancelDelete,
        _ if is_ctrl_c(&key) => Action::CancelDelete,
        _ => Action::Tick,
    }
}

fn handle_key_deleting(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Action::HideProgress,
        _ if is_ctrl_c(&key) => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_message(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => {
            Action::DismissMessage
        }
        _ if is_ctrl_c(&key) => Action::Quit,
        _ => Action::Tick,
    }
}

fn handle_key_browsing(key: KeyEvent, modal_open: bool) -> Action {
    if is_ctrl_c(&key) {
        return Action::Quit;
    }
    match key.code {
        // Quit, or close the lessons popup first
        KeyCode::Char('q') if modal_open => Action::CloseModal,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc if modal_open => Action::CloseModal,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::GoToFirst,
        KeyCode::End | KeyCode::Char('G') => Action::GoToLast,

        // Tabs
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Action::NextTable,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Action::PrevTable,

        // Selection and deletes
        KeyCode::Char(' ') | KeyCode::Char('x') => Action::ToggleCheck,
        KeyCode::Char('a') => Action::SelectNone,
        KeyCode::Char('d') | KeyCode::Delete => Action::Delete,

        KeyCode::Enter => Action::ViewLessons,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('?') => Action::ShowHelp,

        _ => Action::Tick,
    }
}
