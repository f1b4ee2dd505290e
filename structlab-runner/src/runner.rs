//! Analysis runner: wires together loading, the detectors, and the report.
//!
//! Two entry points:
//! - `run_analysis_file()`: loads bars from disk, then runs. Used by the CLI.
//! - `run_analysis()`: takes pre-loaded bars. Used by tests and benches.
//!
//! The pivot/break, gap and RSI analyses only read the shared bar slice, so
//! they run on separate rayon tasks.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use structlab_core::{
    breaks_of_structure, detect_gaps, detect_pivots, rsi, swing_break_status, Bar, SwingSide,
};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{check_bars, dataset_hash, load_bars, DataQuality, LoadError};
use crate::report::{
    AnalysisReport, BreakReport, Envelope, GapReport, RsiPoint, RsiReport, StatusReport,
    SwingReport, SCHEMA_VERSION,
};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Load bars from `path` and run every enabled analysis.
pub fn run_analysis_file(path: &Path, config: &AnalysisConfig) -> Result<AnalysisReport, RunError> {
    let bars = load_bars(path)?;
    run_analysis(&bars, config)
}

/// Run every enabled analysis over pre-loaded bars, with no I/O.
///
/// Fails only on an invalid config. A bar sequence too short for an analysis
/// shows up as that section's `message`.
pub fn run_analysis(bars: &[Bar], config: &AnalysisConfig) -> Result<AnalysisReport, RunError> {
    config.validate()?;

    let quality = check_bars(bars);
    let warnings = if quality.is_clean() {
        Vec::new()
    } else {
        quality_warnings(&quality)
    };

    let sections = config.sections;
    let ((swings, breaks, status), (gaps, rsi)) = rayon::join(
        || structure_sections(bars, config),
        || {
            rayon::join(
                || sections.gaps.then(|| gap_section(bars)),
                || sections.rsi.then(|| rsi_section(bars, config.rsi.periods)),
            )
        },
    );

    let report = AnalysisReport {
        schema_version: SCHEMA_VERSION,
        dataset_hash: dataset_hash(bars),
        config_id: config.config_id(),
        bar_count: bars.len(),
        interval: config.pivots.interval,
        swings,
        breaks,
        status,
        gaps,
        rsi,
        warnings,
    };

    info!(
        bars = report.bar_count,
        interval = report.interval,
        swings = report.swings.as_ref().map(|e| e.data.swing_high.len() + e.data.swing_low.len()),
        breaks = report.breaks.as_ref().map(|e| e.data.break_high.len() + e.data.break_low.len()),
        gaps = report.gaps.as_ref().map(|e| e.data.gap.len()),
        "analysis complete"
    );

    Ok(report)
}

fn quality_warnings(quality: &DataQuality) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(first) = quality.non_increasing.first() {
        warnings.push(format!(
            "{} bar(s) not strictly after the previous bar (first at index {first})",
            quality.non_increasing.len()
        ));
    }
    if let Some(first) = quality.insane.first() {
        warnings.push(format!(
            "{} bar(s) fail the OHLC sanity check (first at index {first})",
            quality.insane.len()
        ));
    }
    warnings
}

/// Pivots over the configured range.
pub fn swing_section(bars: &[Bar], config: &AnalysisConfig) -> Envelope<SwingReport> {
    let pivots = &config.pivots;
    detect_pivots(bars, pivots.interval, pivots.begin_index, pivots.stop_index)
        .map(|scan| {
            debug!(
                range = ?scan.range,
                failures = scan.failures().count(),
                "pivot scan"
            );
            SwingReport::from(&scan)
        })
        .into()
}

/// Breaks of every swing over the full pivot range.
pub fn break_section(bars: &[Bar], config: &AnalysisConfig) -> Envelope<BreakReport> {
    let pivots = &config.pivots;
    breaks_of_structure(bars, pivots.interval, pivots.begin_index, pivots.stop_index)
        .map(BreakReport::from)
        .into()
}

/// Every swing over the full pivot range with its first break, if any.
pub fn status_section(bars: &[Bar], config: &AnalysisConfig) -> Envelope<StatusReport> {
    detect_pivots(bars, config.pivots.interval, None, None)
        .map(|scan| StatusReport {
            swing_high: swing_break_status(&scan.swing_highs(), bars, SwingSide::High),
            swing_low: swing_break_status(&scan.swing_lows(), bars, SwingSide::Low),
        })
        .into()
}

pub fn gap_section(bars: &[Bar]) -> Envelope<GapReport> {
    detect_gaps(bars).map(|gap| GapReport { gap }).into()
}

/// RSI paired with bar times. Never fails: undefined values are `null`.
pub fn rsi_section(bars: &[Bar], periods: usize) -> Envelope<RsiReport> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = bars
        .iter()
        .zip(rsi(&closes, periods))
        .map(|(bar, value)| RsiPoint {
            time: bar.time,
            value,
        })
        .collect();
    Envelope::ok(RsiReport { periods, values })
}

type StructureSections = (
    Option<Envelope<SwingReport>>,
    Option<Envelope<BreakReport>>,
    Option<Envelope<StatusReport>>,
);

fn structure_sections(bars: &[Bar], config: &AnalysisConfig) -> StructureSections {
    let sections = config.sections;
    (
        sections.swings.then(|| swing_section(bars, config)),
        sections.breaks.then(|| break_section(bars, config)),
        sections.status.then(|| status_section(bars, config)),
    )
}
