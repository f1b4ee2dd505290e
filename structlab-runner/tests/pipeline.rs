//! Integration tests for the runner pipeline: file loading through report
//! export, on a small hand-built dataset with one swing of each kind.

use std::path::PathBuf;

use structlab_core::{PricePoint, Timestamp};
use structlab_runner::export::{
    export_breaks_csv, export_gaps_csv, import_json, to_json, write_output,
};
use structlab_runner::{load_bars, run_analysis, run_analysis_file, AnalysisConfig, RunError};

const BASE: i64 = 1_704_153_600_000;

fn t(i: i64) -> Timestamp {
    Timestamp(BASE + i * 60_000)
}

/// Swing high 15.0 at bar 2 (broken at bar 6), swing low 8.0 at bar 4
/// (never broken), bullish gap at bar 6 (never filled).
const ROWS: [(f64, f64, f64, f64); 8] = [
    (10.0, 11.0, 9.0, 10.5),
    (10.5, 12.0, 10.0, 11.5),
    (11.5, 15.0, 11.0, 12.0),
    (12.0, 13.0, 10.5, 11.0),
    (11.0, 12.5, 8.0, 9.0),
    (9.0, 11.0, 9.0, 10.5),
    (10.5, 16.0, 9.5, 15.5),
    (15.5, 17.0, 15.0, 16.5),
];

fn write_csv(dir: &tempfile::TempDir) -> PathBuf {
    let mut text = String::from("time,open,high,low,close,volume\n");
    for (i, (o, h, l, c)) in ROWS.iter().enumerate() {
        text.push_str(&format!("{},{o},{h},{l},{c},100\n", t(i as i64).as_millis()));
    }
    let path = dir.path().join("bars.csv");
    std::fs::write(&path, text).unwrap();
    path
}

fn write_json(dir: &tempfile::TempDir) -> PathBuf {
    let data: Vec<serde_json::Value> = ROWS
        .iter()
        .enumerate()
        .map(|(i, (o, h, l, c))| {
            serde_json::json!({
                "time": t(i as i64).as_millis(),
                "open": o, "high": h, "low": l, "close": c, "volume": 100.0,
            })
        })
        .collect();
    let path = dir.path().join("bars.json");
    std::fs::write(&path, serde_json::json!({ "data": data }).to_string()).unwrap();
    path
}

#[test]
fn csv_and_json_inputs_give_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default();
    let from_csv = run_analysis_file(&write_csv(&dir), &config).unwrap();
    let from_json = run_analysis_file(&write_json(&dir), &config).unwrap();
    assert_eq!(from_csv, from_json);
    assert_eq!(from_csv.bar_count, 8);
}

#[test]
fn report_contents_match_hand_computed_structure() {
    let dir = tempfile::tempdir().unwrap();
    let bars = load_bars(&write_csv(&dir)).unwrap();
    let report = run_analysis(&bars, &AnalysisConfig::default()).unwrap();

    let swings = report.swings.unwrap();
    assert!(swings.is_ok());
    assert_eq!(swings.data.swing_high.len(), 1);
    assert_eq!(swings.data.swing_high[0].time, t(2));
    assert_eq!(swings.data.swing_high[0].is_swing_high, Some(15.0));
    assert_eq!(swings.data.swing_low.len(), 1);
    assert_eq!(swings.data.swing_low[0].is_swing_low, Some(8.0));

    let breaks = report.breaks.unwrap().data;
    assert_eq!(breaks.break_high.len(), 1);
    assert_eq!(breaks.break_high[0].p1, PricePoint::new(t(2), 15.0));
    assert_eq!(breaks.break_high[0].p2, PricePoint::new(t(6), 15.0));
    assert!(breaks.break_low.is_empty());

    let status = report.status.unwrap().data;
    assert_eq!(status.swing_high[0].broken_at, Some(t(6)));
    assert_eq!(status.swing_low[0].broken_at, None);

    let gaps = report.gaps.unwrap().data.gap;
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].index, t(6));
    assert!(gaps[0].is_buy);
    assert_eq!(gaps[0].pre, Some(11.0));
    assert_eq!(gaps[0].post, Some(15.0));
    assert_eq!(gaps[0].end, Some(t(7)));
}

#[test]
fn report_json_roundtrips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_analysis_file(&write_json(&dir), &AnalysisConfig::default()).unwrap();

    let out = dir.path().join("report.json");
    write_output(Some(&out), &to_json(&report, true).unwrap()).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(import_json(&text).unwrap(), report);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["swings"]["message"].is_null());
    assert_eq!(value["breaks"]["data"]["breakHigh"][0]["p2"]["time"], BASE + 6 * 60_000);
    assert_eq!(value["gaps"]["data"]["gap"][0]["isBuy"], true);
}

#[test]
fn csv_exports_one_row_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_analysis_file(&write_csv(&dir), &AnalysisConfig::default()).unwrap();

    let breaks = export_breaks_csv(&report.breaks.unwrap().data).unwrap();
    assert_eq!(breaks.lines().count(), 2);
    assert!(breaks.lines().nth(1).unwrap().starts_with("high,"));

    let gaps = export_gaps_csv(&report.gaps.unwrap().data).unwrap();
    assert_eq!(gaps.lines().count(), 2);
    assert!(gaps.lines().nth(1).unwrap().contains(",buy,"));
}

#[test]
fn config_file_narrows_and_disables() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("analysis.toml");
    std::fs::write(
        &config_path,
        "[pivots]\ninterval = 1\n\n[sections]\ngaps = false\nrsi = false\n",
    )
    .unwrap();
    let config = AnalysisConfig::from_file(&config_path).unwrap();
    let report = run_analysis_file(&write_csv(&dir), &config).unwrap();

    assert_eq!(report.interval, 1);
    assert!(report.gaps.is_none());
    assert!(report.rsi.is_none());
    assert!(report.swings.unwrap().is_ok());
}

#[test]
fn missing_input_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_analysis_file(&dir.path().join("absent.csv"), &AnalysisConfig::default())
        .unwrap_err();
    assert!(matches!(err, RunError::Data(_)));
}
