//! Viewport regions handed to the page image viewer.
//!
//! The viewer does no height arithmetic of its own: it is told which
//! rectangle of the page to bring into view, built from the ledger's offset
//! and resolved height for the focused row.

use crate::ledger::RowHeightLedger;
use serde::Serialize;

/// Default x coordinate of the table's left edge on the page.
pub const DEFAULT_MARGIN_LEFT: f64 = 70.0;

/// Default width of the region requested from the viewer.
pub const DEFAULT_REGION_WIDTH: f64 = 3100.0;

/// Horizontal geometry of the requested region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSettings {
    /// Left edge of the table on the page.
    pub margin_left: f64,
    /// Width of the region.
    pub region_width: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            margin_left: DEFAULT_MARGIN_LEFT,
            region_width: DEFAULT_REGION_WIDTH,
        }
    }
}

/// Rectangle on the page image, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportRegion {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ViewportRegion {
    /// Region for the ledger's focused row.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowledger::ledger::RowHeightLedger;
    /// # use rowledger::model::RowIndex;
    /// # use rowledger::viewer::{ViewerSettings, ViewportRegion};
    /// let mut ledger = RowHeightLedger::default();
    /// ledger.set_index(RowIndex::new(2));
    /// let region = ViewportRegion::for_current_row(&ledger, &ViewerSettings::default());
    /// assert_eq!((region.x, region.y, region.width, region.height), (70.0, 490.0, 3100.0, 25.0));
    /// ```
    pub fn for_current_row(ledger: &RowHeightLedger, settings: &ViewerSettings) -> Self {
        Self {
            x: settings.margin_left,
            y: ledger.offset_at_current(),
            width: settings.region_width,
            height: ledger.resolve_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerSettings;
    use crate::model::RowIndex;

    #[test]
    fn region_at_row_zero_starts_at_margin() {
        let ledger = RowHeightLedger::new(LedgerSettings::new(50.0, 420.0));
        let region = ViewportRegion::for_current_row(&ledger, &ViewerSettings::default());
        assert_eq!(region.y, 420.0);
        assert_eq!(region.height, 50.0);
        assert_eq!(region.x, 70.0);
        assert_eq!(region.width, 3100.0);
    }

    #[test]
    fn region_tracks_corrections() {
        let mut ledger = RowHeightLedger::default();
        ledger.add_correction(RowIndex::new(4), 50.0);
        ledger.set_index(RowIndex::new(5));

        let settings = ViewerSettings {
            margin_left: 0.0,
            region_width: 7800.0,
        };
        let region = ViewportRegion::for_current_row(&ledger, &settings);
        assert_eq!(
            region,
            ViewportRegion {
                x: 0.0,
                y: 615.0,
                width: 7800.0,
                height: 35.0,
            }
        );
    }

    #[test]
    fn region_serializes_as_rectangle() {
        let region = ViewportRegion {
            x: 70.0,
            y: 440.0,
            width: 3100.0,
            height: 25.0,
        };
        let json = serde_json::to_value(region).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"x": 70.0, "y": 440.0, "width": 3100.0, "height": 25.0})
        );
    }
}
