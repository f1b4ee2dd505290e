//! Structural detectors over a bar sequence.
//!
//! All functions here are pure: they read an immutable `&[Bar]` and build
//! fresh result records. Pivots feed structure breaks; gaps stand alone.

pub mod gap;
pub mod pivot;
pub mod structure;

pub use gap::{detect_gap, detect_gaps, resolve_gap_end, MIN_GAP_BARS};
pub use pivot::{detect_pivot, detect_pivots, PivotScan, DEFAULT_INTERVAL};
pub use structure::{
    breaks_of_high, breaks_of_low, breaks_of_structure, first_break, swing_break_status,
};
