//! tricross CLI — fetch bars, run the crossover pipeline, print the report.
//!
//! Commands:
//! - `signals` — fetch klines from Binance (or read a CSV file) and print
//!   the smoothed series and buy/sell signals as JSON
//! - `init-config` — write the default TOML config

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tricross_core::data::{BarSource, BinanceSource, CsvSource, FetchRequest};
use tricross_core::domain::Bar;
use tricross_core::fingerprint::{ConfigHash, ReportDigest};
use tricross_core::{fetch_and_run, Config, SignalReport};

#[derive(Parser)]
#[command(
    name = "tricross",
    about = "tricross — regression/moving-average crossover signals"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch bars, run the pipeline, and print the report as JSON.
    Signals {
        /// Trading pair (e.g., LTCBTC). Overrides the config file.
        #[arg(long)]
        symbol: Option<String>,

        /// Kline interval (e.g., 1h, 4h, 1d). Overrides the config file.
        #[arg(long)]
        interval: Option<String>,

        /// Number of most recent bars to request (1-1000).
        #[arg(long)]
        limit: Option<usize>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read bars from a CSV file instead of Binance.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Include the fetched bars in the output.
        #[arg(long, default_value_t = false)]
        include_bars: bool,
    },
    /// Write the default TOML config.
    InitConfig {
        /// Output path. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Report plus fingerprints, as printed by `signals`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalsOutput<'a> {
    #[serde(flatten)]
    report: &'a SignalReport,
    digest: ReportDigest,
    config_hash: ConfigHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    bars: Option<&'a [Bar]>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json);

    match cli.command {
        Commands::Signals {
            symbol,
            interval,
            limit,
            config,
            csv,
            pretty,
            include_bars,
        } => run_signals(SignalsArgs {
            symbol,
            interval,
            limit,
            config,
            csv,
            pretty,
            include_bars,
        }),
        Commands::InitConfig { output } => run_init_config(output.as_deref()),
    }
}

struct SignalsArgs {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<usize>,
    config: Option<PathBuf>,
    csv: Option<PathBuf>,
    pretty: bool,
    include_bars: bool,
}

fn run_signals(args: SignalsArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(symbol) = args.symbol {
        config.source.symbol = symbol;
    }
    if let Some(interval) = args.interval {
        config.source.interval = interval;
    }
    if let Some(limit) = args.limit {
        config.source.limit = limit;
    }

    let source: Box<dyn BarSource> = match &args.csv {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(BinanceSource::new()?),
    };
    let request = FetchRequest::from(&config.source);

    info!(
        source = source.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        limit = request.limit,
        "running pipeline"
    );
    let (bars, report) = fetch_and_run(source.as_ref(), &request, &config.pipeline)?;

    let digest = ReportDigest::of(&report);
    info!(
        signals = report.signals.len(),
        open_position = ?report.open_position,
        digest = digest.short(),
        "report ready"
    );

    let output = SignalsOutput {
        report: &report,
        digest,
        config_hash: ConfigHash::of(&config.pipeline),
        bars: args.include_bars.then_some(bars.as_slice()),
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");

    Ok(())
}

fn run_init_config(output: Option<&Path>) -> Result<()> {
    let toml = Config::default().to_toml()?;
    match output {
        Some(path) => {
            std::fs::write(path, &toml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "config written");
        }
        None => print!("{toml}"),
    }
    Ok(())
}
