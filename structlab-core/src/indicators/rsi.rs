//! Relative Strength Index (RSI).
//!
//! Simple (not Wilder) averaging of gains and losses:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: periods - 1. The first bar has no prior close and counts as a
//! zero change, so the first value lands at index periods-1.
//! Edge cases: avg_loss == 0 → RSI = 100, including a flat window.

use super::sma::rolling_mean;
use super::Indicator;
use crate::domain::Bar;

pub const DEFAULT_RSI_PERIODS: usize = 14;

/// Value reported when the trailing window holds no losses.
pub const RSI_NO_LOSS: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    periods: usize,
    name: String,
}

impl Rsi {
    pub fn new(periods: usize) -> Self {
        assert!(periods >= 1, "RSI periods must be >= 1");
        Self {
            periods,
            name: format!("rsi_{periods}"),
        }
    }

    pub fn periods(&self) -> usize {
        self.periods
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIODS)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.periods.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rsi(&closes, self.periods)
    }
}

/// RSI over a close-price series. One entry per close.
///
/// A NaN close leaves every window that touches its change without a value.
pub fn rsi(closes: &[f64], periods: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];

    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        if change.is_nan() {
            gains[i] = f64::NAN;
            losses[i] = f64::NAN;
        } else if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let avg_gain = rolling_mean(&gains, periods);
    let avg_loss = rolling_mean(&losses, periods);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| Some(compute_rsi(gain?, loss?)))
        .collect()
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        RSI_NO_LOSS
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
