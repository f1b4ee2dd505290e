//! Break of structure: the first later close through a swing level.
//!
//! "Later" is decided by each bar's `time`, not its position, so a bar
//! sequence that is out of order still yields the first qualifying bar in
//! sequence order among those timed after the swing.

use tracing::debug;

use crate::domain::{
    Bar, PricePoint, StructureBreak, StructureBreaks, SwingBreakStatus, SwingSide, Timestamp,
};
use crate::error::AnalysisError;

use super::pivot::detect_pivots;

/// Breaks of swing highs: first bar with `close > price` after the swing.
pub fn breaks_of_high(swing_highs: &[PricePoint], bars: &[Bar]) -> Vec<StructureBreak> {
    collect_breaks(swing_highs, bars, SwingSide::High)
}

/// Breaks of swing lows: first bar with `close < price` after the swing.
pub fn breaks_of_low(swing_lows: &[PricePoint], bars: &[Bar]) -> Vec<StructureBreak> {
    collect_breaks(swing_lows, bars, SwingSide::Low)
}

/// Detect pivots over the whole sequence and find the breaks of each.
///
/// `begin_index` and `stop_index` do not narrow the pivot scan here: a
/// swing near the edge of a narrowed range can still be broken inside it,
/// so the full default range is always used.
pub fn breaks_of_structure(
    bars: &[Bar],
    interval: usize,
    begin_index: Option<usize>,
    stop_index: Option<usize>,
) -> Result<StructureBreaks, AnalysisError> {
    let scan = detect_pivots(bars, interval, None, None)?;
    debug!(
        interval,
        ?begin_index,
        ?stop_index,
        "structure breaks use the full pivot range"
    );

    let swing_highs = scan.swing_highs();
    let swing_lows = scan.swing_lows();

    Ok(StructureBreaks {
        break_low: breaks_of_low(&swing_lows, bars),
        break_high: breaks_of_high(&swing_highs, bars),
    })
}

/// Every swing point with the time it was first broken, or `None`.
pub fn swing_break_status(
    swings: &[PricePoint],
    bars: &[Bar],
    side: SwingSide,
) -> Vec<SwingBreakStatus> {
    swings
        .iter()
        .map(|swing| SwingBreakStatus {
            side,
            time: swing.time,
            price: swing.price,
            broken_at: first_break(swing, bars, side),
        })
        .collect()
}

fn collect_breaks(swings: &[PricePoint], bars: &[Bar], side: SwingSide) -> Vec<StructureBreak> {
    swings
        .iter()
        .filter_map(|swing| {
            first_break(swing, bars, side).map(|time| StructureBreak {
                p1: *swing,
                p2: PricePoint::new(time, swing.price),
            })
        })
        .collect()
}

/// Time of the first bar timed after `swing.time` whose close crosses the level.
pub fn first_break(swing: &PricePoint, bars: &[Bar], side: SwingSide) -> Option<Timestamp> {
    bars.iter()
        .find(|b| {
            b.time > swing.time
                && match side {
                    SwingSide::High => b.close > swing.price,
                    SwingSide::Low => b.close < swing.price,
                }
        })
        .map(|b| b.time)
}
