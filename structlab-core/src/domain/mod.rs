//! Domain types for StructLab

pub mod bar;
pub mod gap;
pub mod pivot;
pub mod structure;

pub use bar::{Bar, BarSeries, Timestamp};
pub use gap::Gap;
pub use pivot::{Pivot, PricePoint, SwingSide};
pub use structure::{StructureBreak, StructureBreaks, SwingBreakStatus};
