//! Simple Moving Average over an arbitrary series.
//!
//! Rolling mean over a trailing window of `period` values.
//! First value at index period-1; earlier entries are `None`.

/// Trailing simple mean of `values` over `period` entries.
///
/// A window containing NaN yields `None`. `period == 0` yields all `None`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    for (i, slot) in result.iter_mut().enumerate().skip(period - 1) {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        *slot = Some(window.iter().sum::<f64>() / period as f64);
    }

    result
}
