//! StructLab Core: bar domain types and structural detectors.
//!
//! This crate contains the pure computational core:
//! - Domain types (bars, pivots, structure breaks, gaps)
//! - Swing pivot detection over a symmetric window
//! - Break-of-structure detection against swing highs and lows
//! - Three-bar gap detection with fill resolution
//! - RSI over closing prices
//!
//! Every function takes an immutable bar slice and returns fresh values.
//! Data-insufficiency is reported as [`AnalysisError`], never as a panic.

pub mod analysis;
pub mod domain;
pub mod error;
pub mod indicators;

pub use analysis::{
    breaks_of_high, breaks_of_low, breaks_of_structure, detect_gap, detect_gaps, detect_pivot,
    detect_pivots, resolve_gap_end, swing_break_status, PivotScan, DEFAULT_INTERVAL,
};
pub use domain::{
    Bar, BarSeries, Gap, Pivot, PricePoint, StructureBreak, StructureBreaks, SwingBreakStatus,
    SwingSide, Timestamp,
};
pub use error::AnalysisError;
pub use indicators::{rsi, Indicator, Rsi, DEFAULT_RSI_PERIODS};
