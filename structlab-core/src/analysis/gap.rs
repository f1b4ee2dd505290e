//! Three-bar price gaps and when they fill.
//!
//! The middle bar's direction picks the side: a bullish middle bar leaves a
//! gap when the previous high is below the next low, a bearish (or doji)
//! middle bar when the previous low is above the next high. A gap fills at
//! the first later close back across the `pre` level.

use crate::domain::{Bar, Gap};
use crate::error::AnalysisError;

/// Minimum bars needed to form a triple.
pub const MIN_GAP_BARS: usize = 3;

/// Evaluate the triple centred on `index`.
///
/// Returns `None` when `index` has no neighbour on one side, i.e. outside
/// `1..=len-2`. The returned gap has `end` unset.
pub fn detect_gap(bars: &[Bar], index: usize) -> Option<Gap> {
    let prev = bars.get(index.checked_sub(1)?)?;
    let current = bars.get(index)?;
    let next = bars.get(index.checked_add(1)?)?;

    let is_buy = current.is_bullish();
    let (is_gap, pre, post) = if is_buy {
        (prev.high < next.low, prev.high, next.low)
    } else {
        (prev.low > next.high, prev.low, next.high)
    };

    Some(Gap {
        index: current.time,
        is_buy,
        is_gap,
        pre: is_gap.then_some(pre),
        post: is_gap.then_some(post),
        valid: is_gap,
        end: None,
    })
}

/// Find where a gap closes.
///
/// `end` becomes the time of the first bar timed after `gap.index` whose close is
/// back across `pre` (below it for a buy gap, above it for a sell gap). An
/// unfilled gap ends at the last bar: it is open through the end of data.
/// A candidate without a `pre` level is returned as is.
pub fn resolve_gap_end(bars: &[Bar], gap: &Gap) -> Gap {
    let Some(pre) = gap.pre else {
        return *gap;
    };

    let fill = bars.iter().find(|b| {
        b.time > gap.index && if gap.is_buy { b.close < pre } else { b.close > pre }
    });

    Gap {
        end: fill.or_else(|| bars.last()).map(|b| b.time),
        ..*gap
    }
}

/// Scan every interior bar and return the resolved gaps, in bar order.
pub fn detect_gaps(bars: &[Bar]) -> Result<Vec<Gap>, AnalysisError> {
    let len = bars.len();
    if len < MIN_GAP_BARS {
        return Err(AnalysisError::InsufficientData {
            len,
            min_len: MIN_GAP_BARS,
        });
    }

    Ok((1..len - 1)
        .filter_map(|index| detect_gap(bars, index))
        .filter(|gap| gap.is_gap)
        .map(|gap| resolve_gap_end(bars, &gap))
        .collect())
}
