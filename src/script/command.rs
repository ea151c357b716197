//! Command line parsing.
//!
//! One command per line, words separated by whitespace. `#` starts a
//! comment; blank lines are skipped.

use crate::model::{RowIndex, ScriptError};

/// A parsed driver command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <row>` - focus a row.
    Set(RowIndex),
    /// `up` - focus the row above.
    Up,
    /// `down` - focus the row below.
    Down,
    /// `correct [<row>] <delta>` - record a misalignment; the focused row
    /// when no row is given.
    Correct {
        /// Row the delta was observed at.
        row: Option<RowIndex>,
        /// Observed misalignment in pixels.
        delta: f64,
    },
    /// `offset [<row>]` - offset of a row, the focused one by default.
    Offset(Option<RowIndex>),
    /// `height` - resolved height of the focused row.
    Height,
    /// `region` - viewer region for the focused row.
    Region,
    /// `default <px>` - replace the default row height.
    DefaultHeight(f64),
    /// `manifest <name>` - switch preset, starting a fresh ledger.
    Manifest(String),
    /// `ranges` - dump the override ranges.
    Ranges,
}

/// Parses one input line.
///
/// Returns `Ok(None)` for blank and comment-only lines.
///
/// # Errors
///
/// Returns a [`ScriptError`] carrying `line_no` for unknown commands and
/// bad or missing arguments.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Command>, ScriptError> {
    let content = line.split('#').next().unwrap_or_default();
    let mut words = content.split_whitespace();

    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let parser = ArgParser {
        line: line_no,
        command: name,
        args: &args,
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "set" => {
            parser.at_most(1)?;
            Command::Set(parser.row(0)?)
        }
        "up" => {
            parser.at_most(0)?;
            Command::Up
        }
        "down" => {
            parser.at_most(0)?;
            Command::Down
        }
        "correct" => {
            parser.at_most(2)?;
            match args.len() {
                0 => return Err(parser.missing("[<row>] <delta>")),
                1 => Command::Correct {
                    row: None,
                    delta: parser.number(0, "delta")?,
                },
                _ => Command::Correct {
                    row: Some(parser.row(0)?),
                    delta: parser.number(1, "delta")?,
                },
            }
        }
        "offset" => {
            parser.at_most(1)?;
            if args.is_empty() {
                Command::Offset(None)
            } else {
                Command::Offset(Some(parser.row(0)?))
            }
        }
        "height" => {
            parser.at_most(0)?;
            Command::Height
        }
        "region" => {
            parser.at_most(0)?;
            Command::Region
        }
        "default" => {
            parser.at_most(1)?;
            Command::DefaultHeight(parser.number(0, "height")?)
        }
        "manifest" => {
            parser.at_most(1)?;
            let name = args.first().ok_or_else(|| parser.missing("<name>"))?;
            Command::Manifest((*name).to_string())
        }
        "ranges" => {
            parser.at_most(0)?;
            Command::Ranges
        }
        _ => {
            return Err(ScriptError::UnknownCommand {
                line: line_no,
                command: name.to_string(),
            })
        }
    };

    Ok(Some(command))
}

struct ArgParser<'a> {
    line: usize,
    command: &'a str,
    args: &'a [&'a str],
}

impl ArgParser<'_> {
    fn at_most(&self, count: usize) -> Result<(), ScriptError> {
        if self.args.len() > count {
            return Err(ScriptError::TooManyArguments {
                line: self.line,
                command: self.command.to_string(),
            });
        }
        Ok(())
    }

    fn missing(&self, expected: &'static str) -> ScriptError {
        ScriptError::MissingArgument {
            line: self.line,
            command: self.command.to_string(),
            expected,
        }
    }

    fn raw(&self, position: usize) -> Result<&str, ScriptError> {
        self.args
            .get(position)
            .copied()
            .ok_or_else(|| self.missing("a numeric argument"))
    }

    fn row(&self, position: usize) -> Result<RowIndex, ScriptError> {
        let raw = self.raw(position)?;
        raw.parse::<i64>()
            .map(RowIndex::new)
            .map_err(|_| ScriptError::InvalidNumber {
                line: self.line,
                what: "row",
                value: raw.to_string(),
            })
    }

    fn number(&self, position: usize, what: &'static str) -> Result<f64, ScriptError> {
        let raw = self.raw(position)?;
        raw.parse::<f64>().map_err(|_| ScriptError::InvalidNumber {
            line: self.line,
            what,
            value: raw.to_string(),
        })
    }
}
