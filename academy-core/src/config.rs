//! Configuration loading from `.env` files and environment variables.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{AdminError, Result};
use crate::table::TableId;

pub const LESSONS_URL_VAR: &str = "ACADEMY_LESSONS_URL";
pub const SCHOOLS_URL_VAR: &str = "ACADEMY_SCHOOLS_URL";
pub const SERIES_URL_VAR: &str = "ACADEMY_SERIES_URL";
pub const TOKEN_VAR: &str = "ACADEMY_TOKEN";
pub const TIMEOUT_VAR: &str = "ACADEMY_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_BATCH_GRACE: Duration = Duration::from_secs(5);

/// Endpoints and credentials of the catalog admin API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub lessons_url: String,
    pub schools_url: String,
    pub series_url: String,
    /// Name of the authenticity token field expected by the delete endpoints
    pub token: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Extra time a delete batch waits beyond the request timeout
    pub batch_grace: Duration,
}

impl AdminConfig {
    /// Layered load: `overrides`, then the process environment, then `file`.
    ///
    /// Without a file, a `.env` in the working directory is merged into the
    /// environment if present.
    pub fn load(file: Option<&Path>, overrides: &HashMap<String, String>) -> Result<Self> {
        let file_vars = match file {
            Some(path) => read_env_file(path)?,
            None => {
                // Missing .env is fine
                let _ = dotenvy::dotenv();
                HashMap::new()
            }
        };

        Self::from_lookup(|key| {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AdminError::Config(format!("{} is not set", key)))
        };

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AdminError::Config(format!("{} must be a whole number of seconds", TIMEOUT_VAR))
                })?;
                if secs == 0 {
                    return Err(AdminError::Config(format!(
                        "{} must be greater than zero",
                        TIMEOUT_VAR
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            lessons_url: required(LESSONS_URL_VAR)?,
            schools_url: required(SCHOOLS_URL_VAR)?,
            series_url: required(SERIES_URL_VAR)?,
            token: required(TOKEN_VAR)?,
            request_timeout,
            batch_grace: DEFAULT_BATCH_GRACE,
        })
    }

    /// List endpoint of a tabbed table. The modal table has no fixed endpoint.
    pub fn list_url(&self, table: TableId) -> Option<&str> {
        match table {
            TableId::Lessons => Some(&self.lessons_url),
            TableId::Schools => Some(&self.schools_url),
            TableId::Series => Some(&self.series_url),
            TableId::Modal => None,
        }
    }

    /// How long a delete batch may wait before unanswered requests count as timed out
    pub fn batch_deadline(&self) -> Duration {
        self.request_timeout + self.batch_grace
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let config_err = |e: dotenvy::Error| AdminError::Config(format!("{}: {}", path.display(), e));
    dotenvy::from_path_iter(path)
        .map_err(config_err)?
        .collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(config_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> HashMap<String, String> {
        vars(&[
            (LESSONS_URL_VAR, "https://cms.test/lessons"),
            (SCHOOLS_URL_VAR, "https://cms.test/schools"),
            (SERIES_URL_VAR, "https://cms.test/series"),
            (TOKEN_VAR, "f00dcafe"),
        ])
    }

    #[test]
    fn test_loads_with_defaults() {
        let map = complete();
        let config = AdminConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        assert_eq!(config.token, "f00dcafe");
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.batch_deadline(), Duration::from_secs(20));
        assert_eq!(
            config.list_url(TableId::Series),
            Some("https://cms.test/series")
        );
        assert_eq!(config.list_url(TableId::Modal), None);
    }

    #[test]
    fn test_missing_token_names_variable() {
        let mut map = complete();
        map.remove(TOKEN_VAR);
        let err = AdminConfig::from_lookup(|k| map.get(k).cloned()).unwrap_err();
        match err {
            AdminError::Config(msg) => assert!(msg.contains(TOKEN_VAR)),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut map = complete();
        map.insert(LESSONS_URL_VAR.to_string(), "   ".to_string());
        assert!(AdminConfig::from_lookup(|k| map.get(k).cloned()).is_err());
    }

    #[test]
    fn test_timeout_parsing() {
        let mut map = complete();
        map.insert(TIMEOUT_VAR.to_string(), "3".to_string());
        let config = AdminConfig::from_lookup(|k| map.get(k).cloned()).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(3));

        map.insert(TIMEOUT_VAR.to_string(), "soon".to_string());
        assert!(AdminConfig::from_lookup(|k| map.get(k).cloned()).is_err());

        map.insert(TIMEOUT_VAR.to_string(), "0".to_string());
        assert!(AdminConfig::from_lookup(|k| map.get(k).cloned()).is_err());
    }

    #[test]
    fn test_reads_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# catalog endpoints").unwrap();
        writeln!(file, "ACADEMY_LESSONS_URL=http://localhost/l").unwrap();
        writeln!(file, "ACADEMY_SCHOOLS_URL=http://localhost/sc").unwrap();
        writeln!(file, "ACADEMY_SERIES_URL=http://localhost/se").unwrap();
        writeln!(file, "ACADEMY_TOKEN=\"abc\"").unwrap();
        file.flush().unwrap();

        let file_vars = read_env_file(file.path()).unwrap();
        assert_eq!(file_vars.len(), 4);
        let config = AdminConfig::from_lookup(|k| file_vars.get(k).cloned()).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.lessons_url, "http://localhost/l");
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ACADEMY_LESSONS_URL=http://file/l").unwrap();
        writeln!(file, "ACADEMY_SCHOOLS_URL=http://file/sc").unwrap();
        writeln!(file, "ACADEMY_SERIES_URL=http://file/se").unwrap();
        writeln!(file, "ACADEMY_TOKEN=from-file").unwrap();
        file.flush().unwrap();

        let overrides = vars(&[(TOKEN_VAR, "from-cli"), (TIMEOUT_VAR, "7")]);
        let config = AdminConfig::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.token, "from-cli");
        assert_eq!(config.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_from_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");
        let err = AdminConfig::load(Some(&missing), &HashMap::new()).unwrap_err();
        assert!(matches!(err, AdminError::Config(_)));
    }
}
