//! Structure break records.

use serde::{Deserialize, Serialize};

use super::bar::Timestamp;
use super::pivot::{PricePoint, SwingSide};

/// A later close crossing a prior swing level.
///
/// `p1` is the swing point. `p2` is the time of the first crossing bar paired
/// with the *swing* price, so the two points draw a horizontal line at the
/// broken level rather than reaching for the overshoot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureBreak {
    pub p1: PricePoint,
    pub p2: PricePoint,
}

/// Breaks of swing lows and swing highs for one bar sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureBreaks {
    pub break_low: Vec<StructureBreak>,
    pub break_high: Vec<StructureBreak>,
}

impl StructureBreaks {
    pub fn len(&self) -> usize {
        self.break_low.len() + self.break_high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.break_low.is_empty() && self.break_high.is_empty()
    }
}

/// A swing point annotated with when (if ever) it was broken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingBreakStatus {
    pub side: SwingSide,
    pub time: Timestamp,
    pub price: f64,
    pub broken_at: Option<Timestamp>,
}

impl SwingBreakStatus {
    pub fn is_intact(&self) -> bool {
        self.broken_at.is_none()
    }
}
