use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const FILTER_VAR: &str = "ACADEMY_LOG";
const KEPT_LOG_FILES: usize = 7;

/// Rolling log file of this run.
///
/// Dropping it stops file logging, so keep it alive until the terminal has
/// been restored.
pub struct LogFile {
    pub dir: PathBuf,
    pub prefix: String,
    _guard: WorkerGuard,
}

/// Directory and file name prefix for the log.
///
/// An explicit path is split into its parent and file name; otherwise the
/// log goes to the user cache dir.
pub fn log_location(path: Option<PathBuf>, app_name: &str) -> Option<(PathBuf, String)> {
    match path {
        Some(path) => {
            let prefix = path.file_name()?.to_string_lossy().into_owned();
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Some((dir, prefix))
        }
        None => {
            let dir = dirs::cache_dir()?.join(app_name);
            Some((dir, format!("{}.log", app_name)))
        }
    }
}

/// Daily-rotated writer backed by a background worker thread
pub fn file_writer(dir: &Path, prefix: &str) -> Result<(NonBlocking, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(KEPT_LOG_FILES)
        .build(dir)
        .wrap_err_with(|| format!("creating log file in {}", dir.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Send tracing output to a file; the terminal belongs to the UI
pub fn init_logging(path: Option<PathBuf>, app_name: &str) -> Result<Option<LogFile>> {
    let Some((dir, prefix)) = log_location(path, app_name) else {
        return Ok(None);
    };
    let (writer, guard) = file_writer(&dir, &prefix)?;

    let filter = EnvFilter::try_from_env(FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(LogFile {
        dir,
        prefix,
        _guard: guard,
    }))
}
