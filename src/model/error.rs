//! Error types for rowledger.
//!
//! The ledger itself is total: every operation returns a number and nothing
//! in `crate::ledger` can fail. Errors only come from the shell around it
//! (config files, log setup, command input), and they compose into
//! [`AppError`] via `From` so `main` can use `?` throughout.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from `main`
//!   - [`ConfigError`] - config file read/parse failures, unknown manifest
//!   - [`LoggingError`] - tracing subscriber setup
//!   - [`InputError`] - reading the command script
//!
//! [`ScriptError`] stays out of the hierarchy: a malformed command line is
//! reported in the output stream and the run continues.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// # Recovery Behavior
///
/// - **Config/Logging/Input/Output**: fatal, reported on stderr by `main`
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Command input could not be read.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Writing results to stdout failed.
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),
}

/// Errors encountered when opening command input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The script file does not exist.
    #[error("Script file not found: {path:?}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Generic I/O failure while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single command line that could not be parsed.
///
/// Carries the 1-based line number so the driver can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// First word is not a known command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number.
        line: usize,
        /// The offending word.
        command: String,
    },

    /// A required argument was not given.
    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        /// 1-based line number.
        line: usize,
        /// Command being parsed.
        command: String,
        /// Human description of what was expected.
        expected: &'static str,
    },

    /// An argument could not be parsed as a number.
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Which argument ("row", "delta", ...).
        what: &'static str,
        /// Raw text that failed to parse.
        value: String,
    },

    /// More arguments than the command accepts.
    #[error("line {line}: too many arguments for '{command}'")]
    TooManyArguments {
        /// 1-based line number.
        line: usize,
        /// Command being parsed.
        command: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_converts_to_app_error() {
        let err: AppError = InputError::FileNotFound {
            path: PathBuf::from("/missing.txt"),
        }
        .into();
        assert!(matches!(err, AppError::Input(_)));
        assert!(err.to_string().contains("/missing.txt"));
    }

    #[test]
    fn script_error_message_includes_line() {
        let err = ScriptError::UnknownCommand {
            line: 7,
            command: "jump".to_string(),
        };
        assert_eq!(err.to_string(), "line 7: unknown command 'jump'");
    }

    #[test]
    fn config_error_converts_to_app_error() {
        let err: AppError = ConfigError::UnknownManifest("nope".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn logging_error_converts_to_app_error() {
        let err: AppError = LoggingError::InvalidLevel("loud".to_string()).into();
        assert!(matches!(err, AppError::Logging(_)));
        assert_eq!(err.to_string(), "Logging error: Invalid log level 'loud'");
    }

    #[test]
    fn io_error_converts_to_input_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InputError = io.into();
        assert!(matches!(err, InputError::Io(_)));
    }
}
