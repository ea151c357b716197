//! Height override ranges.

use super::types::RowIndex;
use serde::Serialize;
use std::fmt;

/// A contiguous block of rows sharing one override height.
///
/// Covers `[start, start + length)`. A zero or negative `length` is stored
/// as-is and simply covers no rows; the correction formulas can produce one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeightRange {
    /// First row covered.
    pub start: RowIndex,
    /// Number of consecutive rows covered.
    pub length: i64,
    /// Per-row pixel height for every row in the block.
    pub height: f64,
}

impl HeightRange {
    /// Create a new range.
    pub fn new(start: RowIndex, length: i64, height: f64) -> Self {
        Self {
            start,
            length,
            height,
        }
    }

    /// One past the last covered row.
    pub fn end(&self) -> RowIndex {
        self.start.offset(self.length)
    }

    /// Whether `index` falls inside `[start, end)`.
    pub fn contains(&self, index: RowIndex) -> bool {
        self.start <= index && index < self.end()
    }

    /// Whether two ranges share at least one row.
    ///
    /// Empty ranges never overlap anything.
    pub fn overlaps(&self, other: &HeightRange) -> bool {
        if self.length <= 0 || other.length <= 0 {
            return false;
        }
        self.start < other.end() && other.start < self.end()
    }
}

impl fmt::Display for HeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x{} @ {}px",
            self.start,
            self.end(),
            self.length,
            self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i64, length: i64, height: f64) -> HeightRange {
        HeightRange::new(RowIndex::new(start), length, height)
    }

    #[test]
    fn contains_is_half_open() {
        let r = range(2, 3, 10.0);
        assert!(!r.contains(RowIndex::new(1)));
        assert!(r.contains(RowIndex::new(2)));
        assert!(r.contains(RowIndex::new(4)));
        assert!(!r.contains(RowIndex::new(5)));
    }

    #[test]
    fn zero_length_contains_nothing() {
        let r = range(4, 0, 22.5);
        assert!(!r.contains(RowIndex::new(4)));
        assert_eq!(r.end(), RowIndex::new(4));
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        assert!(!range(0, 5, 1.0).overlaps(&range(5, 5, 1.0)));
        assert!(range(0, 6, 1.0).overlaps(&range(5, 5, 1.0)));
    }

    #[test]
    fn empty_range_never_overlaps() {
        assert!(!range(0, 10, 1.0).overlaps(&range(4, 0, 1.0)));
    }

    #[test]
    fn display_shows_bounds_and_height() {
        assert_eq!(range(0, 4, 22.5).to_string(), "[0, 4) x4 @ 22.5px");
        assert_eq!(range(5, 2, 35.0).to_string(), "[5, 7) x2 @ 35px");
    }
}
