//! Row height ledger - maps row indices to vertical pixel offsets
//!
//! The ledger holds a default per-row height, a top margin, a cursor, and a
//! [`RangeTable`] of height overrides created by user corrections. Every
//! operation is total: inputs are not validated and the result is always a
//! number, even for negative rows or zero-length ranges.
//!
//! # Module Structure
//!
//! - `range_table`: RangeTable - sorted override ranges and lookups
//!
//! # Known quirks
//!
//! These reproduce established behaviour and are selectable or documented
//! rather than silently changed:
//!
//! - The split tail length defaults to a count of *ranges*
//!   ([`SplitTailLength::RangeCount`]), not rows.
//! - The previous-range search defaults to the first match
//!   ([`PreviousRangeSearch::FirstMatch`]), not the nearest.
//! - Offsets fill gaps between ranges at the default height but fill rows
//!   past the last range at the last range's height.
//! - A range height of zero or NaN counts as unset when resolving a height
//!   or the trailing rate, and the next fallback is used instead.

pub mod range_table;

pub use range_table::{PreviousRangeSearch, RangeTable};

use crate::model::{HeightRange, RowIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default per-row height in pixels before any correction.
pub const DEFAULT_ROW_HEIGHT: f64 = 25.0;

/// Default pixel offset of the top of row 0 on the page image.
pub const DEFAULT_MARGIN_TOP: f64 = 440.0;

/// How the length of the trailing range is computed when a correction splits
/// an existing range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitTailLength {
    /// `ranges_before_split - position_of_split_range - 1`.
    ///
    /// A count of other ranges, not of rows. Usually zero for a single
    /// range, leaving the rest of the split range uncovered.
    #[default]
    RangeCount,
    /// Rows of the split range after the corrected row.
    RemainingRows,
}

/// Construction parameters for a [`RowHeightLedger`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSettings {
    /// Fallback per-row height.
    pub default_height: f64,
    /// Offset of the top of row 0.
    pub margin_top: f64,
    /// Previous-range search used by gap corrections.
    pub previous_range_search: PreviousRangeSearch,
    /// Tail length rule used when splitting a range.
    pub split_tail_length: SplitTailLength,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_ROW_HEIGHT,
            margin_top: DEFAULT_MARGIN_TOP,
            previous_range_search: PreviousRangeSearch::default(),
            split_tail_length: SplitTailLength::default(),
        }
    }
}

impl LedgerSettings {
    /// Settings with the given sizes and default strategies.
    pub fn new(default_height: f64, margin_top: f64) -> Self {
        Self {
            default_height,
            margin_top,
            ..Self::default()
        }
    }
}

/// Which rule a correction was applied with, and the ranges it created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "case", rename_all = "kebab-case")]
pub enum Correction {
    /// The row was inside an existing range, which was replaced by a head
    /// ending at the row and a tail starting just after it.
    SplitExisting {
        /// Replaces the split range up to and including the corrected row.
        head: HeightRange,
        /// Starts at the row after the corrected one.
        tail: HeightRange,
    },
    /// The row was past the last range; a range now fills from the end of
    /// the last range through the row.
    ExtendAfterLast {
        /// The new range.
        range: HeightRange,
    },
    /// The row was in a gap before the last range; a range now fills from the
    /// end of the previous range through the row.
    FillAfterPrevious {
        /// The new range.
        range: HeightRange,
    },
    /// No usable range; a range now covers row 0 through the row.
    FromOrigin {
        /// The new range.
        range: HeightRange,
    },
}

/// Row height ledger for one table/page pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct RowHeightLedger {
    settings: LedgerSettings,
    current_index: RowIndex,
    ranges: RangeTable,
}

impl Default for RowHeightLedger {
    fn default() -> Self {
        Self::new(LedgerSettings::default())
    }
}

impl RowHeightLedger {
    /// Creates an empty ledger with the cursor on row 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowledger::ledger::{LedgerSettings, RowHeightLedger};
    /// # use rowledger::model::RowIndex;
    /// let ledger = RowHeightLedger::new(LedgerSettings::new(25.0, 440.0));
    /// assert_eq!(ledger.calculate_offset_height(RowIndex::new(10)), 690.0);
    /// assert_eq!(ledger.resolve_height(), 25.0);
    /// ```
    pub fn new(settings: LedgerSettings) -> Self {
        Self {
            settings,
            current_index: RowIndex::ZERO,
            ranges: RangeTable::new(),
        }
    }

    /// Construction settings, including the current default height.
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Fallback per-row height.
    pub fn default_height(&self) -> f64 {
        self.settings.default_height
    }

    /// Offset of the top of row 0.
    pub fn margin_top(&self) -> f64 {
        self.settings.margin_top
    }

    /// The focused row.
    pub fn current_index(&self) -> RowIndex {
        self.current_index
    }

    /// Override ranges in ascending start order.
    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// Replaces the default height. Existing ranges are untouched.
    pub fn set_default_height(&mut self, height: f64) {
        debug!(height, "Default row height changed");
        self.settings.default_height = height;
    }

    /// Discards all corrections and moves the cursor back to row 0.
    pub fn reset(&mut self) {
        self.ranges.clear();
        self.current_index = RowIndex::ZERO;
    }

    // ===== Lookup =====

    /// First range covering `index`, with its position.
    pub fn find_range_at_index(&self, index: RowIndex) -> Option<(HeightRange, usize)> {
        self.ranges.find_at(index)
    }

    /// Range with the greatest start row.
    pub fn last_range(&self) -> Option<HeightRange> {
        self.ranges.last()
    }

    /// Range preceding `index` under the configured search.
    pub fn find_previous_range(&self, index: RowIndex) -> Option<HeightRange> {
        self.ranges
            .find_previous(index, self.settings.previous_range_search)
    }

    // ===== Height and offset =====

    /// Height of the focused row.
    ///
    /// The covering range's height, else the last range's height, else the
    /// default height. Zero and NaN heights are skipped.
    pub fn resolve_height(&self) -> f64 {
        self.find_range_at_index(self.current_index)
            .and_then(|(range, _)| usable_height(range.height))
            .or_else(|| self.last_range().and_then(|range| usable_height(range.height)))
            .unwrap_or(self.settings.default_height)
    }

    /// Offset of the top of the focused row.
    pub fn offset_at_current(&self) -> f64 {
        self.calculate_offset_height(self.current_index)
    }

    /// Offset of the top of `at_index`, margin included.
    ///
    /// Gaps between ranges are filled at the default height. Rows past the
    /// last range are filled at the last range's height.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowledger::ledger::{LedgerSettings, RowHeightLedger};
    /// # use rowledger::model::RowIndex;
    /// let mut ledger = RowHeightLedger::new(LedgerSettings::new(25.0, 440.0));
    /// ledger.add_correction(RowIndex::new(4), 50.0);
    /// assert_eq!(ledger.calculate_offset_height(RowIndex::new(5)), 615.0);
    /// assert_eq!(ledger.calculate_offset_height(RowIndex::new(10)), 790.0);
    /// ```
    pub fn calculate_offset_height(&self, at_index: RowIndex) -> f64 {
        let mut offset = self.settings.margin_top;

        if at_index == RowIndex::ZERO {
            return offset;
        }

        let default_height = self.settings.default_height;
        let mut processed_up_to = RowIndex::ZERO;

        for range in &self.ranges {
            if range.start > processed_up_to {
                let gap_end = range.start.min(at_index);
                offset += processed_up_to.rows_until(gap_end) as f64 * default_height;
                processed_up_to = gap_end;
            }

            if processed_up_to >= at_index {
                break;
            }

            let process_end = range.end().min(at_index);
            let rows = range.start.max(processed_up_to).rows_until(process_end);

            if rows > 0 {
                offset += rows as f64 * range.height;
                processed_up_to = process_end;
            }

            if processed_up_to >= at_index {
                break;
            }
        }

        if processed_up_to < at_index {
            let trailing_height = self
                .last_range()
                .and_then(|range| usable_height(range.height))
                .unwrap_or(default_height);
            offset += processed_up_to.rows_until(at_index) as f64 * trailing_height;
        }

        offset
    }

    // ===== Corrections =====

    /// Records a misalignment of `delta` pixels observed at `at_index`.
    ///
    /// The delta is spread evenly over the rows from the nearest known
    /// boundary through `at_index`. See [`Correction`] for the four cases;
    /// they are tried in declaration order.
    pub fn add_correction(&mut self, at_index: RowIndex, delta: f64) -> Correction {
        let correction = self.apply_correction(at_index, delta);
        debug!(
            row = %at_index,
            delta,
            ?correction,
            ranges = self.ranges.len(),
            "Correction applied"
        );
        correction
    }

    fn apply_correction(&mut self, at_index: RowIndex, delta: f64) -> Correction {
        if let Some((existing, position)) = self.ranges.find_at(at_index) {
            let ranges_before_split = self.ranges.len();
            let head_length = existing.start.rows_until(at_index).saturating_add(1);
            let height = existing.height + delta / head_length as f64;
            let tail_length = match self.settings.split_tail_length {
                SplitTailLength::RangeCount => {
                    ranges_before_split as i64 - position as i64 - 1
                }
                SplitTailLength::RemainingRows => at_index.next().rows_until(existing.end()),
            };

            let head = HeightRange::new(existing.start, head_length, height);
            let tail = HeightRange::new(at_index.next(), tail_length, height);

            self.ranges.remove(position);
            self.ranges.insert(head);
            self.ranges.insert(tail);

            return Correction::SplitExisting { head, tail };
        }

        if let Some(last) = self.last_range().filter(|last| last.start < at_index) {
            let range = Self::range_through(&last, at_index, delta);
            self.ranges.insert(range);
            return Correction::ExtendAfterLast { range };
        }

        if let Some(previous) = self.find_previous_range(at_index) {
            let range = Self::range_through(&previous, at_index, delta);
            self.ranges.insert(range);
            return Correction::FillAfterPrevious { range };
        }

        let length = at_index.get().saturating_add(1);
        let height = self.settings.default_height + delta / length as f64;
        let range = HeightRange::new(RowIndex::ZERO, length, height);
        self.ranges.insert(range);
        Correction::FromOrigin { range }
    }

    /// Range from the end of `after` through `at_index`, its height being
    /// `after`'s plus the delta spread over its rows.
    fn range_through(after: &HeightRange, at_index: RowIndex, delta: f64) -> HeightRange {
        let start = after.end();
        let length = start.rows_until(at_index).saturating_add(1);
        HeightRange::new(start, length, after.height + delta / length as f64)
    }

    // ===== Navigation =====

    /// Moves the cursor to `index` and returns its resolved height.
    pub fn set_index(&mut self, index: RowIndex) -> f64 {
        self.current_index = index;
        self.resolve_height()
    }

    /// Moves the cursor up one row and returns its resolved height.
    pub fn move_up(&mut self) -> f64 {
        self.current_index = self.current_index.prev();
        self.resolve_height()
    }

    /// Moves the cursor down one row and returns its resolved height.
    pub fn move_down(&mut self) -> f64 {
        self.current_index = self.current_index.next();
        self.resolve_height()
    }
}

/// Zero and NaN heights are treated as unset.
fn usable_height(height: f64) -> Option<f64> {
    (height != 0.0 && !height.is_nan()).then_some(height)
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
