//! Command input sources.
//!
//! Commands come from a script file when a path is given, otherwise from
//! stdin (piped or typed interactively).

use crate::model::error::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Where command lines are read from.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum ScriptSource {
    /// An opened script file.
    File {
        /// Path the file was opened from.
        path: PathBuf,
        /// Open handle.
        file: File,
    },
    /// Standard input.
    Stdin,
}

impl ScriptSource {
    /// Human-readable name for log messages.
    pub fn describe(&self) -> String {
        match self {
            ScriptSource::File { path, .. } => path.display().to_string(),
            ScriptSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Buffered reader over the source's lines.
    pub fn into_reader(self) -> Box<dyn BufRead> {
        match self {
            ScriptSource::File { file, .. } => Box::new(BufReader::new(file)),
            ScriptSource::Stdin => Box::new(BufReader::new(io::stdin())),
        }
    }
}

/// Detect and open the appropriate command source.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if `file` is given but does not exist.
/// Returns `InputError::Io` if it exists but cannot be opened.
pub fn detect_script_source(file: Option<PathBuf>) -> Result<ScriptSource, InputError> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound { path });
            }
            let file = File::open(&path)?;
            Ok(ScriptSource::File { path, file })
        }
        None => Ok(ScriptSource::Stdin),
    }
}
