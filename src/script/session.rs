//! Driver session - one ledger plus the viewer geometry it feeds.

use super::command::Command;
use crate::config::{select_manifest, ConfigError, ResolvedConfig};
use crate::ledger::{Correction, RowHeightLedger};
use crate::model::{HeightRange, RowIndex};
use crate::viewer::{ViewerSettings, ViewportRegion};
use serde::Serialize;
use tracing::info;

/// Result of one command, written as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Outcome {
    /// Cursor moved (`set`, `up`, `down`).
    Moved {
        /// New focused row.
        index: RowIndex,
        /// Its resolved height.
        height: f64,
        /// Region to bring into view.
        region: ViewportRegion,
    },
    /// A correction was recorded.
    Corrected {
        /// Row the delta was applied at.
        index: RowIndex,
        /// The delta.
        delta: f64,
        /// How it was applied.
        correction: Correction,
    },
    /// Offset of a row.
    Offset {
        /// Queried row.
        index: RowIndex,
        /// Offset of its top edge.
        offset: f64,
    },
    /// Resolved height of the focused row.
    Height {
        /// Focused row.
        index: RowIndex,
        /// Its resolved height.
        height: f64,
    },
    /// Viewer region of the focused row.
    Region {
        /// Focused row.
        index: RowIndex,
        /// Region to bring into view.
        region: ViewportRegion,
    },
    /// Default row height replaced.
    DefaultHeight {
        /// New default height.
        height: f64,
    },
    /// Manifest switched.
    Manifest {
        /// Preset name.
        name: String,
        /// Preset label.
        label: String,
        /// Ledger default height.
        default_height: f64,
        /// Ledger top margin.
        margin_top: f64,
        /// Viewer region width.
        width: f64,
    },
    /// Range table dump.
    Ranges {
        /// Ranges in ascending start order.
        ranges: Vec<HeightRange>,
    },
    /// The line could not be run.
    Error {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// A ledger and viewer geometry driven by commands.
#[derive(Debug, Clone)]
pub struct Session {
    config: ResolvedConfig,
    ledger: RowHeightLedger,
    viewer: ViewerSettings,
}

impl Session {
    /// Fresh session from resolved configuration.
    pub fn new(config: ResolvedConfig) -> Self {
        let ledger = RowHeightLedger::new(config.ledger_settings());
        let viewer = config.viewer_settings();
        Self {
            config,
            ledger,
            viewer,
        }
    }

    /// The ledger.
    pub fn ledger(&self) -> &RowHeightLedger {
        &self.ledger
    }

    /// The viewer geometry.
    pub fn viewer(&self) -> &ViewerSettings {
        &self.viewer
    }

    /// Region for the focused row.
    pub fn region(&self) -> ViewportRegion {
        ViewportRegion::for_current_row(&self.ledger, &self.viewer)
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Only `manifest` can fail, with `ConfigError::UnknownManifest`; the
    /// session is left unchanged in that case.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, ConfigError> {
        let outcome = match command {
            Command::Set(index) => {
                let height = self.ledger.set_index(index);
                self.moved(height)
            }
            Command::Up => {
                let height = self.ledger.move_up();
                self.moved(height)
            }
            Command::Down => {
                let height = self.ledger.move_down();
                self.moved(height)
            }
            Command::Correct { row, delta } => {
                let index = row.unwrap_or(self.ledger.current_index());
                let correction = self.ledger.add_correction(index, delta);
                Outcome::Corrected {
                    index,
                    delta,
                    correction,
                }
            }
            Command::Offset(row) => {
                let index = row.unwrap_or(self.ledger.current_index());
                Outcome::Offset {
                    index,
                    offset: self.ledger.calculate_offset_height(index),
                }
            }
            Command::Height => Outcome::Height {
                index: self.ledger.current_index(),
                height: self.ledger.resolve_height(),
            },
            Command::Region => Outcome::Region {
                index: self.ledger.current_index(),
                region: self.region(),
            },
            Command::DefaultHeight(height) => {
                self.ledger.set_default_height(height);
                Outcome::DefaultHeight { height }
            }
            Command::Manifest(name) => self.switch_manifest(&name)?,
            Command::Ranges => Outcome::Ranges {
                ranges: self.ledger.ranges().iter().copied().collect(),
            },
        };
        Ok(outcome)
    }

    fn moved(&self, height: f64) -> Outcome {
        Outcome::Moved {
            index: self.ledger.current_index(),
            height,
            region: self.region(),
        }
    }

    fn switch_manifest(&mut self, name: &str) -> Result<Outcome, ConfigError> {
        let config = select_manifest(self.config.clone(), name)?;
        let label = config
            .manifests
            .get(name)
            .map(|preset| preset.label.clone())
            .unwrap_or_default();

        info!(
            manifest = name,
            discarded_ranges = self.ledger.ranges().len(),
            "Switching manifest; corrections discarded"
        );

        *self = Self::new(config);

        Ok(Outcome::Manifest {
            name: name.to_string(),
            label,
            default_height: self.ledger.default_height(),
            margin_top: self.ledger.margin_top(),
            width: self.viewer.region_width,
        })
    }
}
