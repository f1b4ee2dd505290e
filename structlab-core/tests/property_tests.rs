//! Property tests for detector invariants.
//!
//! Uses proptest to verify:
//! 1. Locality: pivot flags depend only on the bars inside the window
//! 2. Strictness: a high tied with either side is never a swing high
//! 3. Minimum length: short sequences fail the whole pivot scan
//! 4. Break ordering: a break is the earliest later qualifying close
//! 5. Gap closure: a gap's end never precedes it, and defaults to the last bar
//! 6. RSI bounds: every defined RSI value lies in [0, 100]

use proptest::prelude::*;
use structlab_core::{
    breaks_of_high, breaks_of_low, detect_gaps, detect_pivot, detect_pivots, rsi, AnalysisError,
    Bar, PricePoint, Timestamp,
};

// ── Strategies (proptest) ────────────────────────────────────────────

/// (mid, up, down, open position, close position) per bar.
fn arb_bar_parts() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (
        10.0..200.0_f64,
        0.0..5.0_f64,
        0.0..5.0_f64,
        0.0..=1.0_f64,
        0.0..=1.0_f64,
    )
}

fn build_bars(parts: &[(f64, f64, f64, f64, f64)]) -> Vec<Bar> {
    parts
        .iter()
        .enumerate()
        .map(|(i, &(mid, up, down, o, c))| {
            let high = ((mid + up) * 100.0).round() / 100.0;
            let low = ((mid - down) * 100.0).round() / 100.0;
            Bar {
                time: Timestamp(1_600_000_000_000 + i as i64 * 60_000),
                open: low + (high - low) * o,
                high,
                low,
                close: low + (high - low) * c,
                volume: 1.0,
            }
        })
        .collect()
}

fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(arb_bar_parts(), min..max).prop_map(|parts| build_bars(&parts))
}

// ── 1. Locality ──────────────────────────────────────────────────────

proptest! {
    /// Reversing the bars outside the window leaves the flags unchanged.
    #[test]
    fn pivot_ignores_bars_outside_window(
        bars in arb_bars(9, 40),
        interval in 1usize..4,
        seed in any::<prop::sample::Index>(),
    ) {
        prop_assume!(bars.len() > 2 * interval);
        let index = interval + seed.index(bars.len() - 2 * interval);
        let original = detect_pivot(&bars, index, interval).unwrap();

        let mut shuffled = bars.clone();
        let (lo, hi) = (index - interval, index + interval);
        // Swap price data (not times) of the outside bars end for end.
        let outside: Vec<usize> = (0..bars.len()).filter(|&i| i < lo || i > hi).collect();
        for (a, b) in outside.iter().zip(outside.iter().rev()) {
            shuffled[*a].high = bars[*b].high;
            shuffled[*a].low = bars[*b].low;
        }

        let moved = detect_pivot(&shuffled, index, interval).unwrap();
        prop_assert_eq!(original.is_swing_high, moved.is_swing_high);
        prop_assert_eq!(original.is_swing_low, moved.is_swing_low);
        prop_assert_eq!(original.valid, moved.valid);
    }
}

// ── 2. Strictness ────────────────────────────────────────────────────

proptest! {
    /// Copying the current high onto any neighbour removes the swing-high flag.
    #[test]
    fn tied_high_is_never_a_swing_high(
        bars in arb_bars(5, 30),
        interval in 1usize..3,
        seed in any::<prop::sample::Index>(),
        neighbour in any::<prop::sample::Index>(),
    ) {
        prop_assume!(bars.len() > 2 * interval);
        let index = interval + seed.index(bars.len() - 2 * interval);
        let offsets: Vec<usize> = (index - interval..=index + interval)
            .filter(|&i| i != index)
            .collect();
        let tie_at = offsets[neighbour.index(offsets.len())];

        let mut tied = bars.clone();
        tied[tie_at].high = tied[index].high;

        let pivot = detect_pivot(&tied, index, interval).unwrap();
        prop_assert_eq!(pivot.is_swing_high, None);
    }

    /// Flags, when set, always carry the bar's own extreme.
    #[test]
    fn flags_carry_the_bar_extremes(bars in arb_bars(5, 30), interval in 1usize..3) {
        prop_assume!(bars.len() > 2 * interval);
        let scan = detect_pivots(&bars, interval, None, None).unwrap();
        for (index, result) in scan.range.clone().zip(scan.results.iter()) {
            let pivot = result.as_ref().unwrap();
            if let Some(high) = pivot.is_swing_high {
                prop_assert_eq!(high, bars[index].high);
            }
            if let Some(low) = pivot.is_swing_low {
                prop_assert_eq!(low, bars[index].low);
            }
            prop_assert_eq!(
                pivot.valid,
                pivot.is_swing_high.is_some() || pivot.is_swing_low.is_some()
            );
        }
    }
}

// ── 3. Minimum length ────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_sequences_fail_pivot_scan(interval in 1usize..6, shortfall in 1usize..5) {
        let min_len = 2 * interval + 1;
        let len = min_len.saturating_sub(shortfall);
        let parts: Vec<_> = (0..len).map(|i| (100.0 + i as f64, 1.0, 1.0, 0.5, 0.5)).collect();
        let bars = build_bars(&parts);
        prop_assert_eq!(
            detect_pivots(&bars, interval, None, None),
            Err(AnalysisError::InsufficientData { len, min_len })
        );
    }

    /// Narrowing requests never push the scan outside the default range.
    #[test]
    fn narrowed_range_stays_inside_default(
        bars in arb_bars(5, 60),
        interval in 1usize..3,
        begin in prop::option::of(0usize..70),
        stop in prop::option::of(0usize..70),
    ) {
        prop_assume!(bars.len() > 2 * interval);
        let scan = detect_pivots(&bars, interval, begin, stop).unwrap();
        prop_assert!(scan.range.start >= interval);
        prop_assert!(scan.range.end <= bars.len() - interval);
        prop_assert!(scan.range.start < scan.range.end);
        prop_assert_eq!(scan.results.len(), scan.range.len());
        prop_assert_eq!(scan.failures().count(), 0);
    }
}

// ── 4. Break ordering ────────────────────────────────────────────────

proptest! {
    #[test]
    fn breaks_are_earliest_later_crossing(
        bars in arb_bars(3, 50),
        picks in prop::collection::vec((any::<prop::sample::Index>(), 10.0..200.0_f64), 1..6),
    ) {
        let swings: Vec<PricePoint> = picks
            .iter()
            .map(|(i, price)| PricePoint::new(bars[i.index(bars.len())].time, *price))
            .collect();

        for brk in breaks_of_high(&swings, &bars) {
            prop_assert!(brk.p2.time > brk.p1.time);
            prop_assert_eq!(brk.p2.price, brk.p1.price);
            let expected = bars
                .iter()
                .find(|b| b.time > brk.p1.time && b.close > brk.p1.price)
                .map(|b| b.time);
            prop_assert_eq!(Some(brk.p2.time), expected);
        }

        for brk in breaks_of_low(&swings, &bars) {
            prop_assert!(brk.p2.time > brk.p1.time);
            let expected = bars
                .iter()
                .find(|b| b.time > brk.p1.time && b.close < brk.p1.price)
                .map(|b| b.time);
            prop_assert_eq!(Some(brk.p2.time), expected);
        }

        // A swing is omitted exactly when no later bar crosses it.
        let crossed = swings
            .iter()
            .filter(|s| bars.iter().any(|b| b.time > s.time && b.close > s.price))
            .count();
        prop_assert_eq!(breaks_of_high(&swings, &bars).len(), crossed);
    }
}

// ── 5. Gap closure ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn gap_end_never_precedes_gap(bars in arb_bars(3, 60)) {
        let last = bars.last().unwrap().time;
        for gap in detect_gaps(&bars).unwrap() {
            prop_assert!(gap.is_gap && gap.valid);
            let end = gap.end.unwrap();
            prop_assert!(end >= gap.index);

            let pre = gap.pre.unwrap();
            let fill = bars.iter().find(|b| {
                b.time > gap.index && if gap.is_buy { b.close < pre } else { b.close > pre }
            });
            match fill {
                Some(bar) => prop_assert_eq!(end, bar.time),
                None => prop_assert_eq!(end, last),
            }
        }
    }
}

// ── 6. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_stays_in_bounds(
        closes in prop::collection::vec(1.0..500.0_f64, 0..120),
        periods in 1usize..30,
    ) {
        let values = rsi(&closes, periods);
        prop_assert_eq!(values.len(), closes.len());
        for (i, v) in values.iter().enumerate() {
            if i + 1 < periods {
                prop_assert!(v.is_none());
            } else {
                let v = v.unwrap();
                prop_assert!((0.0..=100.0).contains(&v), "RSI {} at {}", v, i);
            }
        }
    }
}
