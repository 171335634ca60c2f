//! Command-line interface: argument definitions and dispatch.
//!
//! The command implementations live in [`commands`].

pub mod commands;
pub mod output;
pub mod system_clock;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::errors::ForecastError;

/// Cash-flow forecasting from revenue and expense records
#[derive(Debug, Parser)]
#[command(name = "cashflow_cli")]
#[command(about = "Project monthly cash flow from financial records", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the configuration file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging for the forecasting crates (added on top of RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the records come from: a JSON file or a stored dataset.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// JSON file containing an array of financial records
    #[arg(short, long, conflicts_with = "dataset")]
    pub input: Option<PathBuf>,

    /// Name of a dataset previously stored with `import`
    #[arg(short, long)]
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Number of months to project (defaults to the configured horizon)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Reference date (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long, value_parser = parse_reference_date)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the month-by-month projection
    Forecast {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Output format: table, csv, json
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print the forecast summary
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// List months with negative or low projected balances
    Alerts {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Warn when the balance drops below this amount
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Bucket receivables and payables by days overdue
    Aging {
        #[command(flatten)]
        source: SourceArgs,
        /// Reference date (YYYY-MM-DD); defaults to the current UTC date
        #[arg(long, value_parser = parse_reference_date)]
        today: Option<NaiveDate>,
    },

    /// Write the projection to a file
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
        /// Output format: csv, json, table
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Store a JSON record file as a named dataset
    Import {
        /// JSON file containing an array of financial records
        #[arg(short, long)]
        input: PathBuf,
        /// Dataset name
        #[arg(short, long)]
        name: String,
    },

    /// List stored datasets
    Datasets,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print build information
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print every setting
    Show,
    /// Change one setting
    Set {
        /// One of: locale, currency, horizon, low-balance-threshold, color, export-format,
        /// data-root
        key: String,
        value: String,
    },
    /// Print the configuration file location
    Path,
}

fn parse_reference_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<(), ForecastError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), ForecastError> {
    crate::init_with_verbosity(cli.verbose);
    commands::dispatch(cli)
}
