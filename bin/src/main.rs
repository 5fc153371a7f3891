//! Margin CLI binary.
//!
//! Provides a command-line interface for the Margin value screener.

mod cmd;
mod display;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use margin_screen::ScreenerConfig;
use margin_traits::{Criterion, FilterCriteria};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "margin")]
#[command(about = "Benjamin Graham value screener for listed equities", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with screener settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (ticker lists, processed tables, registries)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for filtered results
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available markets
    Markets,

    /// Show the default Graham criteria and their ranges
    Criteria,

    /// Screen a market
    Screen {
        /// Market display name or code (e.g. "London Stock Exchange" or LON)
        market: String,

        #[command(flatten)]
        thresholds: Thresholds,

        /// Start from the stored Graham criteria; threshold flags override them
        #[arg(long)]
        graham_defaults: bool,

        /// Re-screen the last processed table without fetching
        #[arg(long)]
        offline: bool,

        /// Export the raw result table as CSV (default name if no path given)
        #[arg(long, value_name = "PATH")]
        export: Option<Option<PathBuf>>,

        /// Maximum concurrent fetches
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
    },
}

/// Custom threshold flags, in the units shown to users.
#[derive(Args, Debug, Default)]
struct Thresholds {
    /// Maximum P/E ratio
    #[arg(long)]
    pe_max: Option<f64>,

    /// Maximum P/B ratio
    #[arg(long)]
    pb_max: Option<f64>,

    /// Maximum P/E × P/B
    #[arg(long)]
    pe_pb_max: Option<f64>,

    /// Maximum debt/equity
    #[arg(long)]
    debt_to_equity_max: Option<f64>,

    /// Minimum current ratio
    #[arg(long)]
    current_ratio_min: Option<f64>,

    /// Minimum dividend yield in percent
    #[arg(long)]
    dividend_yield_min: Option<f64>,

    /// Minimum EPS
    #[arg(long, allow_hyphen_values = true)]
    eps_min: Option<f64>,

    /// Minimum market cap in millions
    #[arg(long)]
    market_cap_min: Option<f64>,
}

impl Thresholds {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with(Criterion::PeMax, self.pe_max)
            .with(Criterion::PbMax, self.pb_max)
            .with(Criterion::PePbMax, self.pe_pb_max)
            .with(Criterion::DebtToEquityMax, self.debt_to_equity_max)
            .with(Criterion::CurrentRatioMin, self.current_ratio_min)
            .with(Criterion::DividendYieldMin, self.dividend_yield_min)
            .with(Criterion::EpsMin, self.eps_min)
            .with(Criterion::MarketCapMin, self.market_cap_min)
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("margin=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Markets => {
            cmd::markets::list_markets(&config)?;
        }
        Commands::Criteria => {
            cmd::criteria::show_criteria(&config)?;
        }
        Commands::Screen {
            market,
            thresholds,
            graham_defaults,
            offline,
            export,
            concurrency,
        } => {
            let config = match concurrency {
                Some(n) => config.with_concurrency(n),
                None => config,
            };
            let options = cmd::screen::ScreenOptions {
                market,
                criteria: thresholds.criteria(),
                graham_defaults,
                offline,
                export,
            };
            cmd::screen::run_screen(config, options).await?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ScreenerConfig> {
    let mut config = match &cli.config {
        Some(path) => ScreenerConfig::from_file(path)?,
        None => ScreenerConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = &cli.results_dir {
        config = config.with_results_dir(dir);
    }
    Ok(config)
}
