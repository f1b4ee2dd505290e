//! StructLab Runner: loading, configuration, orchestration and export.
//!
//! This crate builds on `structlab-core` to provide:
//! - Bar loading from JSON or CSV, plus seeded synthetic bars
//! - TOML analysis configuration with a content-hash ID
//! - A runner that evaluates every enabled analysis into one report
//! - `{ message, data }` report envelopes and JSON/CSV/Markdown export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;
pub mod runner;

pub use config::{AnalysisConfig, ConfigError, PivotConfig, RsiConfig, SectionConfig};
pub use data_loader::{
    check_bars, dataset_hash, generate_synthetic_bars, load_bars, DataQuality, LoadError,
};
pub use report::{
    AnalysisReport, BreakReport, Envelope, GapReport, RsiPoint, RsiReport, StatusReport,
    SwingReport, SCHEMA_VERSION,
};
pub use runner::{
    break_section, gap_section, rsi_section, run_analysis, run_analysis_file, status_section,
    swing_section, RunError,
};
