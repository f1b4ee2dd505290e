//! Price gap records.

use serde::{Deserialize, Serialize};

use super::bar::Timestamp;

/// Three-bar price discontinuity.
///
/// `index` is the time of the middle bar, whose direction decides which
/// side of the gap is tested. `pre` is the level on the older bar, `post`
/// the level on the newer one. `end` is filled in by gap-end resolution:
/// the first later close back inside the gap, or the last bar's time when
/// the gap is still open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub index: Timestamp,
    pub is_buy: bool,
    pub is_gap: bool,
    pub pre: Option<f64>,
    pub post: Option<f64>,
    pub valid: bool,
    pub end: Option<Timestamp>,
}

impl Gap {
    /// Width of the empty price region, if this is a gap.
    pub fn size(&self) -> Option<f64> {
        match (self.pre, self.post) {
            (Some(pre), Some(post)) => Some((post - pre).abs()),
            _ => None,
        }
    }
}
