//! Data-insufficiency errors.
//!
//! None of these are faults: they describe a bar sequence that is too short
//! or a window that does not fit, and are returned as values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(
        "cannot slice window: would go out of bounds (start: {start}, end: {end}, length: {len})"
    )]
    WindowOutOfBounds { start: i64, end: i64, len: usize },

    #[error("data only has length of {len}, minimum length is {min_len}")]
    InsufficientData { len: usize, min_len: usize },
}

impl AnalysisError {
    pub(crate) fn window(index: usize, interval: usize, len: usize) -> Self {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        let interval = i64::try_from(interval).unwrap_or(i64::MAX);
        Self::WindowOutOfBounds {
            start: index.saturating_sub(interval),
            end: index.saturating_add(interval),
            len,
        }
    }
}
