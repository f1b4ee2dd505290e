//! StructLab CLI: structural analysis of OHLC bar files.
//!
//! Commands:
//! - `analyze`: run every enabled analysis and emit the full report
//! - `pivots`: swing highs and lows
//! - `breaks`: breaks of structure, as JSON or CSV
//! - `status`: every swing with the time it was first broken
//! - `gaps`: three-bar gaps and their fills, as JSON or CSV
//! - `rsi`: RSI over closing prices
//! - `synth`: write seeded synthetic bars for experimentation
//!
//! Results go to stdout (or `--output`); logs go to stderr.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use structlab_core::{Bar, Timestamp};
use structlab_runner::export::{
    bars_to_json, export_breaks_csv, export_gaps_csv, generate_summary, to_json, write_output,
};
use structlab_runner::{
    break_section, gap_section, generate_synthetic_bars, load_bars, rsi_section,
    run_analysis, status_section, swing_section, AnalysisConfig,
};

#[derive(Parser)]
#[command(
    name = "structlab",
    version,
    about = "StructLab CLI: swing pivots, structure breaks, gaps and RSI over OHLC bars"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Bar file: .json (`{"data": [...]}` or an array) or .csv.
    #[arg(short, long)]
    input: PathBuf,

    /// Write results here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Single-line JSON.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled analysis and emit the full report.
    Analyze {
        #[command(flatten)]
        io: InputArgs,

        /// Path to a TOML analysis config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pivot interval (overrides the config).
        #[arg(long)]
        interval: Option<usize>,

        /// Print a Markdown summary instead of JSON.
        #[arg(long, default_value_t = false)]
        summary: bool,
    },
    /// Swing highs and lows.
    Pivots {
        #[command(flatten)]
        io: InputArgs,

        /// Bars on each side of a candidate.
        #[arg(long, default_value_t = structlab_core::DEFAULT_INTERVAL)]
        interval: usize,

        /// First index to scan (ignored if it would over-narrow the range).
        #[arg(long)]
        begin: Option<usize>,

        /// Scan end, exclusive (ignored if it would over-narrow the range).
        #[arg(long)]
        stop: Option<usize>,
    },
    /// Breaks of structure against every swing.
    Breaks {
        #[command(flatten)]
        io: InputArgs,

        #[arg(long, default_value_t = structlab_core::DEFAULT_INTERVAL)]
        interval: usize,

        /// Emit CSV rows instead of JSON.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Every swing with the time it was first broken.
    Status {
        #[command(flatten)]
        io: InputArgs,

        #[arg(long, default_value_t = structlab_core::DEFAULT_INTERVAL)]
        interval: usize,
    },
    /// Three-bar gaps and where they fill.
    Gaps {
        #[command(flatten)]
        io: InputArgs,

        /// Emit CSV rows instead of JSON.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// RSI over closing prices.
    Rsi {
        #[command(flatten)]
        io: InputArgs,

        #[arg(long, default_value_t = structlab_core::DEFAULT_RSI_PERIODS)]
        periods: usize,
    },
    /// Write seeded synthetic bars as JSON.
    Synth {
        /// Number of bars.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First bar time, epoch milliseconds.
        #[arg(long, default_value_t = 1_704_153_600_000)]
        start: i64,

        /// Bar spacing in milliseconds.
        #[arg(long, default_value_t = 60_000)]
        step_ms: i64,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze {
            io,
            config,
            interval,
            summary,
        } => run_analyze(&io, config.as_deref(), interval, summary),
        Commands::Pivots {
            io,
            interval,
            begin,
            stop,
        } => {
            let mut config = config_with_interval(interval)?;
            config.pivots.begin_index = begin;
            config.pivots.stop_index = stop;
            let bars = load(&io)?;
            emit_json(&io, &swing_section(&bars, &config))
        }
        Commands::Breaks { io, interval, csv } => {
            let config = config_with_interval(interval)?;
            let bars = load(&io)?;
            let section = break_section(&bars, &config);
            if csv {
                fail_on_message(section.message.as_deref())?;
                write_output(io.output.as_deref(), &export_breaks_csv(&section.data)?)
            } else {
                emit_json(&io, &section)
            }
        }
        Commands::Status { io, interval } => {
            let config = config_with_interval(interval)?;
            let bars = load(&io)?;
            emit_json(&io, &status_section(&bars, &config))
        }
        Commands::Gaps { io, csv } => {
            let bars = load(&io)?;
            let section = gap_section(&bars);
            if csv {
                fail_on_message(section.message.as_deref())?;
                write_output(io.output.as_deref(), &export_gaps_csv(&section.data)?)
            } else {
                emit_json(&io, &section)
            }
        }
        Commands::Rsi { io, periods } => {
            if periods == 0 {
                bail!("--periods must be >= 1");
            }
            let bars = load(&io)?;
            emit_json(&io, &rsi_section(&bars, periods))
        }
        Commands::Synth {
            bars,
            seed,
            start,
            step_ms,
            output,
        } => run_synth(bars, seed, Timestamp(start), step_ms, output.as_deref()),
    }
}

/// Logs to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "structlab=info,structlab_runner=info,structlab_core=warn",
        1 => "structlab=debug,structlab_runner=debug,structlab_core=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn run_analyze(
    io: &InputArgs,
    config_path: Option<&Path>,
    interval: Option<usize>,
    summary: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(interval) = interval {
        config.pivots.interval = interval;
    }

    let bars = load(io)?;
    let report = run_analysis(&bars, &config)?;

    if summary {
        write_output(io.output.as_deref(), &generate_summary(&report))
    } else {
        emit_json(io, &report)
    }
}

fn run_synth(
    n: usize,
    seed: u64,
    start: Timestamp,
    step_ms: i64,
    output: Option<&Path>,
) -> Result<()> {
    if step_ms <= 0 {
        bail!("--step-ms must be positive");
    }
    let bars = generate_synthetic_bars(n, seed, start, step_ms);
    info!(bars = bars.len(), seed, "generated synthetic bars");
    write_output(output, &bars_to_json(&bars, false)?)
}

fn config_with_interval(interval: usize) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();
    config.pivots.interval = interval;
    config.validate()?;
    Ok(config)
}

fn load(io: &InputArgs) -> Result<Vec<Bar>> {
    let bars = load_bars(&io.input)?;
    structlab_runner::check_bars(&bars);
    Ok(bars)
}

fn emit_json<T: serde::Serialize>(io: &InputArgs, value: &T) -> Result<()> {
    write_output(io.output.as_deref(), &to_json(value, !io.compact)?)
}

/// CSV has no `message` column, so a failed section is a CLI error.
fn fail_on_message(message: Option<&str>) -> Result<()> {
    match message {
        Some(msg) => bail!("{msg}"),
        None => Ok(()),
    }
}
