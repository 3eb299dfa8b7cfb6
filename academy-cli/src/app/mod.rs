mod action;
mod loader;
mod state;

pub use action::Action;
pub use loader::TableLoader;
pub use state::{AppMode, AppState, SessionStats, TableData};
