//! Swing pivot records.

use serde::{Deserialize, Serialize};

use super::bar::Timestamp;

/// Result of evaluating one bar against its symmetric window.
///
/// `is_swing_high` / `is_swing_low` carry the extreme price when set. Both
/// can be set at once when the window is degenerate; consumers that split
/// pivots into highs and lows simply see the bar on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    pub time: Timestamp,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub interval: usize,
    pub is_swing_high: Option<f64>,
    pub is_swing_low: Option<f64>,
    pub valid: bool,
}

impl Pivot {
    pub fn swing_high(&self) -> Option<PricePoint> {
        self.is_swing_high.map(|price| PricePoint::new(self.time, price))
    }

    pub fn swing_low(&self) -> Option<PricePoint> {
        self.is_swing_low.map(|price| PricePoint::new(self.time, price))
    }
}

/// A (time, price) coordinate: a swing point reduced to what the break
/// detector needs, or an endpoint of a structure break line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: Timestamp,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: Timestamp, price: f64) -> Self {
        Self { time, price }
    }
}

/// Which side of the market a swing point sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingSide {
    High,
    Low,
}
