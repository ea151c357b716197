//! Headless command driver.
//!
//! Stands in for the table widget: focus changes and user corrections arrive
//! as text commands, and every result the viewer would consume is written
//! out as one JSON line.
//!
//! # Module Structure
//!
//! - `command`: Command - line parser
//! - `session`: Session - ledger + viewer geometry, executes commands

pub mod command;
pub mod session;

pub use command::{parse_line, Command};
pub use session::{Outcome, Session};

use crate::model::{AppError, InputError};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed successfully.
    pub commands: usize,
    /// Lines that produced an error outcome.
    pub errors: usize,
}

/// Runs every line of `reader` against `session`, writing one JSON line per
/// command to `writer`.
///
/// Bad lines are non-fatal: they are logged, reported as an `error` outcome,
/// and the run continues.
///
/// # Errors
///
/// Returns `AppError::Input` if reading fails and `AppError::Output` if
/// writing fails.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    reader: R,
    writer: &mut W,
) -> Result<RunSummary, AppError> {
    let mut summary = RunSummary::default();

    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line.map_err(InputError::from)?;

        let outcome = match parse_line(&line, line_no) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                debug!(line = line_no, ?command, "Executing command");
                session.execute(command).map_err(|e| e.to_string())
            }
            Err(e) => Err(e.to_string()),
        };

        let outcome = match outcome {
            Ok(outcome) => {
                summary.commands += 1;
                outcome
            }
            Err(message) => {
                warn!(line = line_no, %message, "Command failed");
                summary.errors += 1;
                Outcome::Error {
                    line: line_no,
                    message,
                }
            }
        };

        write_outcome(writer, &outcome).map_err(AppError::Output)?;
    }

    Ok(summary)
}

fn write_outcome<W: Write>(writer: &mut W, outcome: &Outcome) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, outcome)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use std::io::Cursor;

    fn run_script(script: &str) -> (RunSummary, Vec<serde_json::Value>) {
        let mut session = Session::new(ResolvedConfig::default());
        let mut out = Vec::new();
        let summary = run(&mut session, Cursor::new(script), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, lines)
    }

    #[test]
    fn runs_concrete_scenario() {
        let (summary, lines) = run_script(
            "# empty ledger\n\
             offset 10\n\
             correct 4 50\n\
             offset 5\n\
             offset 10\n",
        );
        assert_eq!(
            summary,
            RunSummary {
                commands: 4,
                errors: 0
            }
        );
        assert_eq!(lines[0]["offset"], 690.0);
        assert_eq!(lines[1]["correction"]["range"]["height"], 35.0);
        assert_eq!(lines[2]["offset"], 615.0);
        assert_eq!(lines[3]["offset"], 790.0);
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let (summary, lines) = run_script("set 1\nwobble\nset x\ndown\n");
        assert_eq!(
            summary,
            RunSummary {
                commands: 2,
                errors: 2
            }
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["op"], "error");
        assert_eq!(lines[1]["line"], 2);
        assert_eq!(lines[2]["line"], 3);
        assert_eq!(lines[3]["index"], 2);
    }

    #[test]
    fn unknown_manifest_is_an_error_outcome() {
        let (summary, lines) = run_script("manifest atlantis\n");
        assert_eq!(summary.errors, 1);
        assert_eq!(lines[0]["message"], "Unknown manifest: atlantis");
    }

    #[test]
    fn ranges_dump_lists_split() {
        let (_, lines) = run_script("default 20\ncorrect 9 0\ncorrect 3 10\nranges\n");
        let ranges = lines[3]["ranges"].as_array().unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0]["length"], 4);
        assert_eq!(ranges[0]["height"], 22.5);
        assert_eq!(ranges[1]["start"], 4);
        assert_eq!(ranges[1]["length"], 0);
    }
}
