use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogRow, decode_rows};
use crate::error::{AdminError, Result};
use crate::selection::SelectedItem;
use crate::table::TableId;

/// Form field carrying the id of the record to delete
pub const DELETE_ID_FIELD: &str = "IdToDelete";

/// Body returned by the delete endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of one delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Server confirmed the deletion
    Deleted,
    /// Well-formed response with `success: false`
    Refused { reason: Option<String> },
    /// Connection error, non-2xx status or undecodable body
    Transport { error: String },
    /// No answer within the allowed time
    TimedOut,
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }

    /// Short description for logs and failure details
    pub fn describe(&self) -> String {
        match self {
            DeleteOutcome::Deleted => "deleted".to_string(),
            DeleteOutcome::Refused { reason: Some(r) } => format!("refused: {}", r),
            DeleteOutcome::Refused { reason: None } => "refused by server".to_string(),
            DeleteOutcome::Transport { error } => format!("transport error: {}", error),
            DeleteOutcome::TimedOut => "timed out".to_string(),
        }
    }
}

/// Issues delete requests for single items.
///
/// Called from worker threads, one call per item. Implementations must
/// return exactly once per call and never panic on server errors.
pub trait DeleteClient: Send + Sync {
    fn delete(&self, item: &SelectedItem) -> DeleteOutcome;
}

/// HTTP client for the catalog list and delete endpoints
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    token: String,
}

impl AdminClient {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("academy-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::from_http(http, token))
    }

    /// Wrap an already configured HTTP client
    pub fn from_http(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }

    /// Form body of a delete request: the id plus the authenticity token set to "1"
    pub fn delete_form(&self, item_id: u64) -> [(String, String); 2] {
        [
            (DELETE_ID_FIELD.to_string(), item_id.to_string()),
            (self.token.clone(), "1".to_string()),
        ]
    }

    /// Fetch and decode the full contents of a table
    pub fn fetch_rows(&self, table: TableId, url: &str) -> Result<Vec<CatalogRow>> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text()?;
        let rows = decode_rows(table, &body)?;
        debug!(%table, rows = rows.len(), "fetched table");
        Ok(rows)
    }

    fn post_delete(&self, item: &SelectedItem) -> Result<DeleteResponse> {
        let response = self
            .http
            .post(&item.delete_endpoint)
            .form(&self.delete_form(item.item_id))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Status {
                status: status.as_u16(),
                url: item.delete_endpoint.clone(),
            });
        }
        let body = response.text()?;
        serde_json::from_str(&body)
            .map_err(|e| AdminError::Decode(e.to_string()))
    }
}

impl DeleteClient for AdminClient {
    fn delete(&self, item: &SelectedItem) -> DeleteOutcome {
        match self.post_delete(item) {
            Ok(DeleteResponse { success: true, .. }) => DeleteOutcome::Deleted,
            Ok(DeleteResponse { message, .. }) => DeleteOutcome::Refused { reason: message },
            Err(AdminError::Http(e)) if e.is_timeout() => DeleteOutcome::TimedOut,
            Err(e) => DeleteOutcome::Transport {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_form_uses_token_as_field_name() {
        let client = AdminClient::new("a1b2c3", Duration::from_secs(1)).unwrap();
        let form = client.delete_form(42);
        assert_eq!(form[0], ("IdToDelete".to_string(), "42".to_string()));
        assert_eq!(form[1], ("a1b2c3".to_string(), "1".to_string()));
    }

    #[test]
    fn test_outcome_classification() {
        assert!(DeleteOutcome::Deleted.is_success());
        assert!(!DeleteOutcome::Refused { reason: None }.is_success());
        assert!(!DeleteOutcome::TimedOut.is_success());
        assert_eq!(
            DeleteOutcome::Refused {
                reason: Some("locked".into())
            }
            .describe(),
            "refused: locked"
        );
    }
}
