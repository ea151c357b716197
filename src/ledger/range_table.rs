//! RangeTable - height override ranges kept sorted by start row
//!
//! Insertion places a new range after every existing range whose start is
//! `<=` the new start, found by binary search. That is exactly where an
//! append followed by a stable sort would put it, so ranges that share a
//! start row keep insertion order.
//!
//! Overlap is not rejected. An insertion that overlaps a neighbour is
//! reported with `tracing::warn!` and the range is stored anyway, so the
//! offset arithmetic sees precisely what was inserted.
//!
//! # Complexity
//!
//! - `insert`: O(log n) search + O(n) shift
//! - `find_at`: O(n) (first match in sequence order)
//! - `last`: O(1)

use crate::model::{HeightRange, RowIndex};
use serde::Deserialize;
use tracing::warn;

/// How the "previous range" for a gap correction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviousRangeSearch {
    /// First range in sequence order with `start < index`.
    ///
    /// With ranges sorted ascending this is the lowest such range, not the
    /// nearest one. Kept as the default so corrections reproduce existing
    /// behaviour.
    #[default]
    FirstMatch,
    /// Range with the greatest `start < index`.
    Closest,
}

/// A sorted sequence of [`HeightRange`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeTable {
    ranges: Vec<HeightRange>,
}

impl RangeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Number of stored ranges, including empty ones.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if no ranges are stored.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges in ascending start order.
    pub fn iter(&self) -> std::slice::Iter<'_, HeightRange> {
        self.ranges.iter()
    }

    /// Ranges as a slice.
    pub fn as_slice(&self) -> &[HeightRange] {
        &self.ranges
    }

    /// First range covering `index`, with its position in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowledger::ledger::range_table::RangeTable;
    /// # use rowledger::model::{HeightRange, RowIndex};
    /// let mut table = RangeTable::new();
    /// table.insert(HeightRange::new(RowIndex::new(0), 5, 35.0));
    /// let (range, position) = table.find_at(RowIndex::new(3)).unwrap();
    /// assert_eq!(position, 0);
    /// assert_eq!(range.height, 35.0);
    /// assert!(table.find_at(RowIndex::new(5)).is_none());
    /// ```
    pub fn find_at(&self, index: RowIndex) -> Option<(HeightRange, usize)> {
        self.ranges
            .iter()
            .position(|r| r.contains(index))
            .map(|position| (self.ranges[position], position))
    }

    /// Range with the greatest start row (the last in sequence order).
    pub fn last(&self) -> Option<HeightRange> {
        self.ranges.last().copied()
    }

    /// Range preceding `index` under the given search strategy.
    pub fn find_previous(&self, index: RowIndex, search: PreviousRangeSearch) -> Option<HeightRange> {
        match search {
            PreviousRangeSearch::FirstMatch => self.ranges.iter().find(|r| r.start < index).copied(),
            PreviousRangeSearch::Closest => {
                self.ranges.iter().rev().find(|r| r.start < index).copied()
            }
        }
    }

    /// Inserts `range` keeping the table sorted by start row.
    ///
    /// Returns the position the range was stored at.
    pub fn insert(&mut self, range: HeightRange) -> usize {
        let position = self.ranges.partition_point(|r| r.start <= range.start);

        if let Some(other) = self.ranges.iter().find(|r| r.overlaps(&range)) {
            warn!(
                new = %range,
                existing = %other,
                "Height range overlaps an existing range"
            );
        }

        self.ranges.insert(position, range);
        position
    }

    /// Removes and returns the range at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn remove(&mut self, position: usize) -> HeightRange {
        self.ranges.remove(position)
    }

    /// Whether any two stored ranges share a row.
    pub fn has_overlaps(&self) -> bool {
        self.ranges
            .iter()
            .enumerate()
            .any(|(i, a)| self.ranges[i + 1..].iter().any(|b| a.overlaps(b)))
    }

    /// Drops every range.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl<'a> IntoIterator for &'a RangeTable {
    type Item = &'a HeightRange;
    type IntoIter = std::slice::Iter<'a, HeightRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn range(start: i64, length: i64, height: f64) -> HeightRange {
        HeightRange::new(RowIndex::new(start), length, height)
    }

    fn starts(table: &RangeTable) -> Vec<i64> {
        table.iter().map(|r| r.start.get()).collect()
    }

    #[test]
    fn test_empty_table() {
        let table = RangeTable::new();
        assert!(table.is_empty());
        assert_eq!(table.last(), None);
        assert_eq!(table.find_at(RowIndex::ZERO), None);
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut table = RangeTable::new();
        table.insert(range(10, 2, 1.0));
        table.insert(range(0, 2, 1.0));
        table.insert(range(5, 2, 1.0));
        assert_eq!(starts(&table), vec![0, 5, 10]);
    }

    #[test]
    fn test_equal_starts_keep_insertion_order() {
        let mut table = RangeTable::new();
        table.insert(range(5, 3, 1.0));
        let position = table.insert(range(5, 1, 2.0));
        assert_eq!(position, 1);
        assert_eq!(table.as_slice()[0].height, 1.0);
        assert_eq!(table.as_slice()[1].height, 2.0);
    }

    #[test]
    fn test_find_at_returns_first_match() {
        let mut table = RangeTable::new();
        table.insert(range(0, 10, 1.0));
        table.insert(range(3, 2, 2.0));
        let (found, position) = table.find_at(RowIndex::new(4)).unwrap();
        assert_eq!(position, 0);
        assert_eq!(found.height, 1.0);
        assert!(table.has_overlaps());
    }

    #[test]
    fn test_find_at_skips_empty_ranges() {
        let mut table = RangeTable::new();
        table.insert(range(0, 4, 1.0));
        table.insert(range(4, 0, 2.0));
        assert_eq!(table.find_at(RowIndex::new(4)), None);
        assert_eq!(table.last().unwrap().start, RowIndex::new(4));
    }

    #[test]
    fn test_find_previous_first_match_is_lowest() {
        let mut table = RangeTable::new();
        table.insert(range(0, 2, 1.0));
        table.insert(range(5, 2, 2.0));
        table.insert(range(20, 2, 3.0));

        let first = table
            .find_previous(RowIndex::new(10), PreviousRangeSearch::FirstMatch)
            .unwrap();
        assert_eq!(first.start, RowIndex::new(0));

        let closest = table
            .find_previous(RowIndex::new(10), PreviousRangeSearch::Closest)
            .unwrap();
        assert_eq!(closest.start, RowIndex::new(5));
    }

    #[test]
    fn test_find_previous_none_when_all_start_later() {
        let mut table = RangeTable::new();
        table.insert(range(5, 2, 1.0));
        for search in [PreviousRangeSearch::FirstMatch, PreviousRangeSearch::Closest] {
            assert_eq!(table.find_previous(RowIndex::new(5), search), None);
        }
    }

    #[test]
    fn test_remove_returns_range() {
        let mut table = RangeTable::new();
        table.insert(range(0, 2, 1.0));
        table.insert(range(2, 2, 2.0));
        let removed = table.remove(0);
        assert_eq!(removed.height, 1.0);
        assert_eq!(starts(&table), vec![2]);
    }

    #[test]
    fn test_adjacent_ranges_are_not_overlaps() {
        let mut table = RangeTable::new();
        table.insert(range(0, 5, 1.0));
        table.insert(range(5, 5, 1.0));
        assert!(!table.has_overlaps());
    }

    #[test]
    fn test_clear() {
        let mut table = RangeTable::new();
        table.insert(range(0, 5, 1.0));
        table.clear();
        assert!(table.is_empty());
    }

    proptest! {
        /// Any insertion order yields a table sorted by start.
        #[test]
        fn prop_insert_sorts(starts_in in prop::collection::vec(-50i64..50, 0..40)) {
            let mut table = RangeTable::new();
            for &s in &starts_in {
                table.insert(range(s, 1, 1.0));
            }
            let got = starts(&table);
            let mut expected = starts_in.clone();
            expected.sort();
            prop_assert_eq!(got, expected);
        }

        /// Insertion matches append + stable sort, including ties.
        #[test]
        fn prop_insert_matches_stable_sort(starts_in in prop::collection::vec(0i64..8, 0..30)) {
            let mut table = RangeTable::new();
            let mut reference: Vec<HeightRange> = Vec::new();
            for (i, &s) in starts_in.iter().enumerate() {
                let r = range(s, 1, i as f64);
                table.insert(r);
                reference.push(r);
                reference.sort_by(|a, b| a.start.cmp(&b.start));
            }
            prop_assert_eq!(table.as_slice(), reference.as_slice());
        }
    }
}
