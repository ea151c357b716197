//! Tracing subscriber initialization.
//!
//! Logs go to a file so stdout stays reserved for command results.
//! Follow them with `tail -f` in a separate terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file's directory could not be created.
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The log path has no file name or no parent directory.
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// The configured level is not a valid filter directive.
    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    /// Another subscriber is already installed.
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Install a file-backed subscriber writing to `log_path`.
///
/// The filter comes from `RUST_LOG` when it holds valid directives, and
/// from `default_level` (`"info"`, `"rowledger=debug"`, ...) otherwise.
/// The log directory is created if missing.
///
/// # Errors
///
/// Fails if the directory cannot be created, the path has no file name,
/// `default_level` is needed but invalid, or a subscriber is already set.
pub fn init(log_path: &Path, default_level: &str) -> Result<(), LoggingError> {
    let (directory, file_name) = split_log_path(log_path)?;

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = select_filter(rust_log.as_deref(), default_level)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let invalid = || LoggingError::InvalidPath(log_path.to_path_buf());
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;
    let directory = log_path.parent().ok_or_else(invalid)?;
    Ok((directory, file_name))
}

/// `rust_log` wins unless it is unset or unparsable.
fn select_filter(rust_log: Option<&str>, default_level: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(default_level)
        .map_err(|_| LoggingError::InvalidLevel(default_level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn configured_level_used_without_rust_log() {
        let filter = select_filter(None, "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn rust_log_beats_configured_level() {
        let filter = select_filter(Some("rowledger=trace"), "warn").unwrap();
        assert_eq!(filter.to_string(), "rowledger=trace");
    }

    #[test]
    fn unparsable_rust_log_falls_back_to_configured_level() {
        let filter = select_filter(Some("rowledger=loud"), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn unparsable_configured_level_is_rejected() {
        let result = select_filter(None, "rowledger=loud");
        assert!(
            matches!(&result, Err(LoggingError::InvalidLevel(level)) if level == "rowledger=loud")
        );
    }

    #[test]
    fn valid_rust_log_hides_bad_configured_level() {
        assert!(select_filter(Some("info"), "rowledger=loud").is_ok());
    }

    #[test]
    fn log_path_splits_into_directory_and_file() {
        let (directory, file_name) = split_log_path(Path::new("/var/log/rowledger.log")).unwrap();
        assert_eq!(directory, Path::new("/var/log"));
        assert_eq!(file_name, "rowledger.log");
    }

    #[test]
    fn root_path_is_not_a_log_file() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    #[serial(tracing_init)]
    fn bad_level_fails_before_subscriber_install() {
        let log_dir = std::env::temp_dir().join("rowledger_logging_bad_level");
        let _ = fs::remove_dir_all(&log_dir);

        // Only meaningful when RUST_LOG is not overriding the level.
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            let result = init(&log_dir.join("run.log"), "rowledger=loud");
            assert!(matches!(result, Err(LoggingError::InvalidLevel(_))));
            assert!(log_dir.exists(), "Directory is created before the filter is parsed");
        }

        let _ = fs::remove_dir_all(&log_dir);
    }
}
