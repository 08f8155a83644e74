//! Tracing subscriber initialization.
//!
//! Logs go to a file by default so they never mix with report output on
//! stdout. Users can monitor them via `tail -f`. `--log-stderr` sends them to
//! stderr instead.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Where log events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file, creating its directory first.
    File(PathBuf),
    /// Write to standard error.
    Stderr,
}

/// `RUST_LOG` filter, defaulting to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Split a log path into directory and file name, creating the directory.
fn prepare_log_file(log_path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?
        .to_string();

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok((directory, file_name))
}

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, defaults to "info".
///
/// # Errors
/// * directory creation failed for a file target
/// * the log path has no file name
/// * a subscriber was already installed
pub fn init(target: &LogTarget) -> Result<(), LoggingError> {
    match target {
        LogTarget::File(log_path) => {
            let (directory, file_name) = prepare_log_file(log_path)?;
            let file_appender = tracing_appender::rolling::never(directory, file_name);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(file_appender)
                .with_ansi(false)
                .try_init()
                .map_err(|_| LoggingError::SubscriberAlreadySet)
        }
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|_| LoggingError::SubscriberAlreadySet),
    }
}
