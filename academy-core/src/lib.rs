pub mod batch;
pub mod catalog;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod selection;
pub mod table;

pub use batch::{BatchProgress, BatchState, DeleteBatch};
pub use catalog::{CatalogRow, Lesson, School, Series, decode_rows};
pub use client::{AdminClient, DeleteClient, DeleteOutcome, DeleteResponse};
pub use config::AdminConfig;
pub use coordinator::{BatchReport, BulkDeleteCoordinator, ConfirmPrompt, TableRefresher};
pub use error::{AdminError, Result};
pub use selection::{Affordance, SelectedItem, SelectionTracker};
pub use table::TableId;
