//! Core row newtypes

use serde::Serialize;
use std::fmt;

/// Zero-based row index into the table.
///
/// Signed and unvalidated: the ledger cursor may be driven negative or past
/// the last real row, and offsets are still defined there. Arithmetic
/// saturates at the `i64` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct RowIndex(i64);

impl RowIndex {
    /// First row of the table.
    pub const ZERO: Self = Self(0);

    /// Create a new RowIndex from a raw value.
    pub fn new(index: i64) -> Self {
        Self(index)
    }

    /// Get the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }

    /// The row below this one. May go past the last real row.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The row above this one. May go negative.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Shift by a signed number of rows.
    pub fn offset(&self, rows: i64) -> Self {
        Self(self.0.saturating_add(rows))
    }

    /// Signed number of rows from `self` up to (not including) `end`.
    pub fn rows_until(&self, end: RowIndex) -> i64 {
        end.0.saturating_sub(self.0)
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
