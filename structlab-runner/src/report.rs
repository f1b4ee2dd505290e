//! JSON-facing report types.
//!
//! Every section is wrapped in an [`Envelope`] with a `message` that is set
//! exactly when the analysis failed. A failed section carries empty data, so
//! callers check `message` first and ignore `data` when it is set.

use serde::{Deserialize, Serialize};

use structlab_core::{
    AnalysisError, Gap, Pivot, PivotScan, StructureBreak, StructureBreaks, SwingBreakStatus,
    Timestamp,
};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// `{ message, data }` wrapper for one analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub message: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.message.is_none()
    }
}

impl<T: Default> Envelope<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: T::default(),
        }
    }
}

impl<T: Default> From<Result<T, AnalysisError>> for Envelope<T> {
    fn from(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// `{ swingHigh: [Pivot...], swingLow: [Pivot...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwingReport {
    pub swing_high: Vec<Pivot>,
    pub swing_low: Vec<Pivot>,
}

impl From<&PivotScan> for SwingReport {
    fn from(scan: &PivotScan) -> Self {
        Self {
            swing_high: scan.swing_high_pivots(),
            swing_low: scan.swing_low_pivots(),
        }
    }
}

/// `{ breakLow: [...], breakHigh: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakReport {
    pub break_low: Vec<StructureBreak>,
    pub break_high: Vec<StructureBreak>,
}

impl From<StructureBreaks> for BreakReport {
    fn from(breaks: StructureBreaks) -> Self {
        Self {
            break_low: breaks.break_low,
            break_high: breaks.break_high,
        }
    }
}

/// `{ gap: [Gap...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GapReport {
    pub gap: Vec<Gap>,
}

/// Every swing point with the time it was first broken.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub swing_high: Vec<SwingBreakStatus>,
    pub swing_low: Vec<SwingBreakStatus>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RsiPoint {
    pub time: Timestamp,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RsiReport {
    pub periods: usize,
    pub values: Vec<RsiPoint>,
}

/// Complete result of one analysis run.
///
/// Disabled sections are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub dataset_hash: String,
    pub config_id: String,
    pub bar_count: usize,
    pub interval: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swings: Option<Envelope<SwingReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaks: Option<Envelope<BreakReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Envelope<StatusReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaps: Option<Envelope<GapReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Envelope<RsiReport>>,
    /// Data quality warnings (ordering, OHLC sanity).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
