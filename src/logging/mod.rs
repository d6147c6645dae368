//! Tracing subscriber initialization.
//!
//! Logs go to a file so stdout stays clean for piped result fragments;
//! monitor them with `tail -f` in another terminal. Respects `RUST_LOG`,
//! defaulting to `info`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Failed to create log directory at {path:?}: {source}")]
    CreateDirectory {
        /// The directory that failed to be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The log path has no usable file name.
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// A global tracing subscriber is already installed.
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// Initialize file-based tracing at `log_path`, creating the directory when
/// needed.
///
/// # Errors
///
/// Returns [`LoggingError`] when the directory cannot be created, the path
/// has no file name, or a subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_missing_log_directory() {
        let test_dir = std::env::temp_dir().join("circ_test_logs_create");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if a subscriber is already set; the directory must exist
        // regardless.
        let _ = init(&test_dir.join("circ.log"));

        assert!(test_dir.exists(), "log directory should be created");
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_accepts_existing_directory() {
        let test_dir = std::env::temp_dir().join("circ_test_logs_exists");
        let _ = fs::create_dir_all(&test_dir);

        let _ = init(&test_dir.join("circ.log"));

        assert!(test_dir.exists());
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_rejects_path_without_file_name() {
        let result = init(Path::new("/"));
        assert!(matches!(
            result,
            Err(LoggingError::InvalidPath(_)) | Err(LoggingError::CreateDirectory { .. })
        ));
    }
}
