//! Reporting and export: JSON, CSV, and Markdown output.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: structure breaks and gaps for spreadsheets and plotting tools
//! - **Markdown**: a short human-readable summary of a report
//!
//! Unknown schema versions are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};

use structlab_core::Bar;

use crate::report::{AnalysisReport, BreakReport, GapReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize any report section (or the full report) to JSON.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialize report to JSON")
}

/// Deserialize an `AnalysisReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

/// Serialize bars in the `{ "data": [...] }` request shape.
pub fn bars_to_json(bars: &[Bar], pretty: bool) -> Result<String> {
    #[derive(serde::Serialize)]
    struct Doc<'a> {
        data: &'a [Bar],
    }
    to_json(&Doc { data: bars }, pretty)
}

/// Write `content` to `path`, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export structure breaks as CSV, lows first then highs.
///
/// Columns: side, swing_time, swing_date, price, break_time, break_date
pub fn export_breaks_csv(breaks: &BreakReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "side",
        "swing_time",
        "swing_date",
        "price",
        "break_time",
        "break_date",
    ])?;

    let sides = [("low", &breaks.break_low), ("high", &breaks.break_high)];
    for (side, list) in sides {
        for b in list.iter() {
            wtr.write_record([
                &side.to_string(),
                &b.p1.time.as_millis().to_string(),
                &b.p1.time.to_string(),
                &format!("{:.6}", b.p1.price),
                &b.p2.time.as_millis().to_string(),
                &b.p2.time.to_string(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export gaps as CSV.
///
/// Columns: time, date, side, pre, post, size, end_time, end_date
pub fn export_gaps_csv(gaps: &GapReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "time", "date", "side", "pre", "post", "size", "end_time", "end_date",
    ])?;

    for g in &gaps.gap {
        wtr.write_record([
            &g.index.as_millis().to_string(),
            &g.index.to_string(),
            &(if g.is_buy { "buy" } else { "sell" }).to_string(),
            &fmt_price(g.pre),
            &fmt_price(g.post),
            &fmt_price(g.size()),
            &g.end.map(|t| t.as_millis().to_string()).unwrap_or_default(),
            &g.end.map(|t| t.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn fmt_price(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

// ─── Markdown summary ───────────────────────────────────────────────

/// Generate a short Markdown summary of a report.
pub fn generate_summary(report: &AnalysisReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Structure Report\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Bars | {} |\n", report.bar_count));
    md.push_str(&format!("| Interval | {} |\n", report.interval));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push_str(&format!("| Config ID | {} |\n", report.config_id));
    md.push('\n');

    md.push_str("| Section | Result |\n");
    md.push_str("| --- | --- |\n");
    if let Some(env) = &report.swings {
        let line = match &env.message {
            Some(msg) => msg.clone(),
            None => format!(
                "{} highs, {} lows",
                env.data.swing_high.len(),
                env.data.swing_low.len()
            ),
        };
        md.push_str(&format!("| Swings | {line} |\n"));
    }
    if let Some(env) = &report.breaks {
        let line = match &env.message {
            Some(msg) => msg.clone(),
            None => format!(
                "{} high breaks, {} low breaks",
                env.data.break_high.len(),
                env.data.break_low.len()
            ),
        };
        md.push_str(&format!("| Breaks | {line} |\n"));
    }
    if let Some(env) = &report.status {
        let intact = env
            .data
            .swing_high
            .iter()
            .chain(&env.data.swing_low)
            .filter(|s| s.is_intact())
            .count();
        let line = match &env.message {
            Some(msg) => msg.clone(),
            None => format!("{intact} swings unbroken"),
        };
        md.push_str(&format!("| Status | {line} |\n"));
    }
    if let Some(env) = &report.gaps {
        let line = match &env.message {
            Some(msg) => msg.clone(),
            None => {
                let buys = env.data.gap.iter().filter(|g| g.is_buy).count();
                format!("{} buy, {} sell", buys, env.data.gap.len() - buys)
            }
        };
        md.push_str(&format!("| Gaps | {line} |\n"));
    }
    if let Some(env) = &report.rsi {
        let last = env.data.values.iter().rev().find_map(|p| p.value);
        let line = match last {
            Some(v) => format!("RSI({}) last {:.2}", env.data.periods, v),
            None => format!("RSI({}) undefined", env.data.periods),
        };
        md.push_str(&format!("| RSI | {line} |\n"));
    }

    if !report.warnings.is_empty() {
        md.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            md.push_str(&format!("- {w}\n"));
        }
    }

    md
}
