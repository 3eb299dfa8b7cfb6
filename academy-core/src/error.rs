use thiserror::Error;

use crate::table::TableId;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("A delete batch is already running for {0}")]
    BatchInFlight(TableId),

    #[error("No delete is awaiting confirmation for {0}")]
    NoPendingConfirmation(TableId),

    #[error("{0} has lessons and cannot be deleted")]
    HasLessons(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;
