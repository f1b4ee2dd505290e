//! Swing pivot detection.
//!
//! A bar is a swing high when its high is strictly above every high in the
//! `interval` bars on each side of it, and a swing low when its low is
//! strictly below every low on each side. A tie on either side disqualifies.
//! Only bars inside `[index - interval, index + interval]` are looked at.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Bar, Pivot, PricePoint, Timestamp};
use crate::error::AnalysisError;

/// Default half-window width.
pub const DEFAULT_INTERVAL: usize = 2;

/// Evaluate whether `bars[index]` is a local extreme of its window.
///
/// Fails with [`AnalysisError::WindowOutOfBounds`] if the window does not
/// fit inside `bars`.
pub fn detect_pivot(bars: &[Bar], index: usize, interval: usize) -> Result<Pivot, AnalysisError> {
    let len = bars.len();
    let (start, end) = match (index.checked_sub(interval), index.checked_add(interval)) {
        (Some(start), Some(end)) if end < len => (start, end),
        _ => return Err(AnalysisError::window(index, interval, len)),
    };

    let window = &bars[start..=end];
    let (before, rest) = window.split_at(interval);
    let (current, after) = match rest.split_first() {
        Some(split) => split,
        None => return Err(AnalysisError::window(index, interval, len)),
    };

    let is_swing_high = (exceeds(current.high, before, |b| b.high)
        && exceeds(current.high, after, |b| b.high))
    .then_some(current.high);
    let is_swing_low = (undercuts(current.low, before, |b| b.low)
        && undercuts(current.low, after, |b| b.low))
    .then_some(current.low);

    Ok(Pivot {
        time: current.time,
        start_time: window[0].time,
        end_time: window[window.len() - 1].time,
        interval,
        is_swing_high,
        is_swing_low,
        valid: is_swing_high.is_some() || is_swing_low.is_some(),
    })
}

/// `value` strictly above the maximum of `side`. An empty side never passes.
fn exceeds(value: f64, side: &[Bar], field: impl Fn(&Bar) -> f64) -> bool {
    !side.is_empty() && side.iter().all(|b| value > field(b))
}

/// `value` strictly below the minimum of `side`. An empty side never passes.
fn undercuts(value: f64, side: &[Bar], field: impl Fn(&Bar) -> f64) -> bool {
    !side.is_empty() && side.iter().all(|b| value < field(b))
}

/// Output of a batch pivot scan.
///
/// Holds one entry per scanned index, in index order. An entry is an error
/// only if its own window did not fit; the scan as a whole still succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotScan {
    pub interval: usize,
    /// Resolved index range that was scanned.
    pub range: Range<usize>,
    /// Time of the first scanned bar.
    pub start_time: Timestamp,
    /// Time of the last scanned bar.
    pub end_time: Timestamp,
    pub begin_index: Option<usize>,
    pub stop_index: Option<usize>,
    #[serde(skip)]
    pub results: Vec<Result<Pivot, AnalysisError>>,
}

impl PivotScan {
    /// Successfully evaluated pivots, valid or not.
    pub fn pivots(&self) -> impl Iterator<Item = &Pivot> + '_ {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Per-index failures, paired with the index they occurred at.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &AnalysisError)> + '_ {
        self.range
            .clone()
            .zip(self.results.iter())
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// Pivots with the swing-high flag set.
    pub fn swing_high_pivots(&self) -> Vec<Pivot> {
        self.pivots()
            .filter(|p| p.is_swing_high.is_some())
            .copied()
            .collect()
    }

    /// Pivots with the swing-low flag set.
    pub fn swing_low_pivots(&self) -> Vec<Pivot> {
        self.pivots()
            .filter(|p| p.is_swing_low.is_some())
            .copied()
            .collect()
    }

    pub fn swing_highs(&self) -> Vec<PricePoint> {
        self.pivots().filter_map(Pivot::swing_high).collect()
    }

    pub fn swing_lows(&self) -> Vec<PricePoint> {
        self.pivots().filter_map(Pivot::swing_low).collect()
    }
}

/// Scan a contiguous index range for pivots.
///
/// The default range is `[interval, len - interval)`. `begin_index` and
/// `stop_index` may narrow it, but a narrowing that would leave fewer than
/// `2 * interval + 1` indices is ignored rather than rejected.
pub fn detect_pivots(
    bars: &[Bar],
    interval: usize,
    begin_index: Option<usize>,
    stop_index: Option<usize>,
) -> Result<PivotScan, AnalysisError> {
    let len = bars.len();
    let min_len = min_scan_len(interval);
    if len < min_len {
        return Err(AnalysisError::InsufficientData { len, min_len });
    }

    let range = resolve_range(len, interval, min_len, begin_index, stop_index);
    debug!(
        interval,
        start = range.start,
        end = range.end,
        ?begin_index,
        ?stop_index,
        "resolved pivot scan range"
    );

    let results: Vec<_> = range
        .clone()
        .map(|index| detect_pivot(bars, index, interval))
        .collect();

    // len >= 2 * interval + 1 keeps the range non-empty and in bounds.
    let start_time = bars[range.start].time;
    let end_time = bars[range.end - 1].time;

    Ok(PivotScan {
        interval,
        range,
        start_time,
        end_time,
        begin_index,
        stop_index,
        results,
    })
}

/// `2 * interval + 1`, saturating at `usize::MAX` so no sequence is long
/// enough for an interval that large.
fn min_scan_len(interval: usize) -> usize {
    interval
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .unwrap_or(usize::MAX)
}

/// Requires `len >= min_len`, so `len - interval` cannot underflow.
fn resolve_range(
    len: usize,
    interval: usize,
    min_len: usize,
    begin_index: Option<usize>,
    stop_index: Option<usize>,
) -> Range<usize> {
    let mut start = interval;
    let mut end = len - interval;

    if let Some(begin) = begin_index {
        if begin > start && end.checked_sub(begin).is_some_and(|span| span >= min_len) {
            start = begin;
        }
    }

    if let Some(stop) = stop_index {
        if stop.checked_sub(start).is_some_and(|span| span >= min_len) && stop < end {
            end = stop;
        }
    }

    start..end
}
