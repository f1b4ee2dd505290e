//! Bar loading and data quality checks for the runner.
//!
//! Bars come from a file on disk, picked by extension:
//! - `.json`: the request body shape `{ "data": [...] }`, or a bare array
//! - `.csv`: header `time,open,high,low,close,volume` (capitalised provider
//!   headers such as `Open` or `Date` are accepted too)
//!
//! CSV `time` may be epoch milliseconds, RFC 3339, `YYYY-MM-DD HH:MM:SS`, or
//! `YYYY-MM-DD` (midnight UTC). Loading never reorders or drops bars: the
//! detectors are garbage-in/garbage-out, so anomalies are only logged.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use structlab_core::{Bar, BarSeries, Timestamp};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bar CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unrecognised timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("unsupported input format '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Either accepted JSON document shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum BarsDocument {
    Series(BarSeries),
    Bare(Vec<Bar>),
}

/// One CSV row before timestamp parsing.
#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(alias = "Time", alias = "date", alias = "Date", alias = "Datetime")]
    time: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: f64,
}

/// Load bars from a `.json` or `.csv` file.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let bars = match ext.as_str() {
        "json" => parse_json(&text)?,
        "csv" => parse_csv(&text)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}

/// Parse `{ "data": [...] }` or a bare bar array.
pub fn parse_json(text: &str) -> Result<Vec<Bar>, LoadError> {
    let doc: BarsDocument = serde_json::from_str(text)?;
    Ok(match doc {
        BarsDocument::Series(series) => series.data,
        BarsDocument::Bare(bars) => bars,
    })
}

/// Parse CSV with a header row.
pub fn parse_csv(text: &str) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut bars = Vec::new();
    for (i, row) in reader.deserialize::<CsvBar>().enumerate() {
        let row = row?;
        let time = parse_timestamp(&row.time).ok_or_else(|| LoadError::BadTimestamp {
            // 1-based, counting the header line.
            row: i + 2,
            value: row.time.clone(),
        })?;
        bars.push(Bar {
            time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

/// Parse epoch millis, RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<i64>() {
        return Some(Timestamp(millis));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Timestamp::from(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(Timestamp::from(naive.and_utc()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp::from(naive.and_utc()))
}

/// Anomalies found in a bar sequence. Indices refer to the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataQuality {
    /// Bars whose time is not strictly after the previous bar's.
    pub non_increasing: Vec<usize>,
    /// Bars failing the OHLC sanity check.
    pub insane: Vec<usize>,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        self.non_increasing.is_empty() && self.insane.is_empty()
    }
}

/// Check ordering and OHLC sanity, logging a warning per kind of problem.
pub fn check_bars(bars: &[Bar]) -> DataQuality {
    let non_increasing: Vec<usize> = bars
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].time <= pair[0].time)
        .map(|(i, _)| i + 1)
        .collect();
    let insane: Vec<usize> = bars
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_sane())
        .map(|(i, _)| i)
        .collect();

    if let Some(first) = non_increasing.first() {
        warn!(
            count = non_increasing.len(),
            first_index = first,
            "bar times are not strictly increasing"
        );
    }
    if let Some(first) = insane.first() {
        warn!(
            count = insane.len(),
            first_index = first,
            "bars fail the OHLC sanity check"
        );
    }

    DataQuality {
        non_increasing,
        insane,
    }
}

/// Compute a deterministic BLAKE3 hash over all bar data.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.time.as_millis().to_le_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate synthetic bars for testing/development.
///
/// A seeded random walk from 100.0, one bar every `step_ms` starting at
/// `start`. Occasional jumps leave room for gaps to form.
pub fn generate_synthetic_bars(n: usize, seed: u64, start: Timestamp, step_ms: i64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;

    for i in 0..n {
        let jump = if rng.gen_bool(0.05) {
            rng.gen_range(-0.04..0.04)
        } else {
            0.0
        };
        let open = price * (1.0 + jump);
        let close = open * (1.0 + rng.gen_range(-0.02..0.02));
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.006));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.006));

        bars.push(Bar {
            time: Timestamp(start.as_millis() + i as i64 * step_ms),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(500.0..5_000.0),
        });

        price = close;
    }

    bars
}
