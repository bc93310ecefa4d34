//! Command-line parsing for the liquidity signal dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{AnalysisConfig, NarrativeKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "liq", version, about = "Net liquidity, dollar and credit signal dashboard (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full report: market data, correlations, signals and composite score.
    Report(RunArgs),
    /// Print the composite score only (useful for scripting).
    Score(RunArgs),
    /// Print the full-period correlation matrix.
    Matrix(RunArgs),
    /// Re-run the analysis periodically, reusing cached fetches within the TTL.
    Watch(WatchArgs),
}

/// Common options for every analysis run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Lookback in calendar days (365, 730, 1095, 1825 are typical).
    #[arg(short = 'd', long, default_value_t = AnalysisConfig::DEFAULT_DAYS)]
    pub days: u32,

    /// Rolling correlation window in rows (30..=180).
    #[arg(short = 'w', long, default_value_t = AnalysisConfig::DEFAULT_WINDOW)]
    pub window: usize,

    /// As-of date (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Rows used for the net liquidity trailing change.
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_LIQUIDITY_PERIODS)]
    pub liquidity_periods: usize,

    /// Lag (rows) for the S&P 500 / HY spread divergence signals.
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_DIVERGENCE_LAG)]
    pub divergence_lag: usize,

    /// Most recent rows scanned for divergences.
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_DIVERGENCE_LOOKBACK)]
    pub divergence_lookback: usize,

    /// Use seeded synthetic series instead of fetching from FRED.
    #[arg(long)]
    pub demo: bool,

    /// Random seed for `--demo` data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export the report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Ask the language model for commentary on the report.
    #[arg(long, value_enum)]
    pub narrate: Option<NarrativeKind>,
}

/// Options for `liq watch`.
#[derive(Debug, Args, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Seconds between runs.
    #[arg(long, default_value_t = 600)]
    pub interval: u64,

    /// Stop after this many runs (runs forever when omitted).
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Cache time-to-live in seconds.
    #[arg(long, default_value_t = crate::data::cache::DEFAULT_TTL_SECS)]
    pub cache_ttl: i64,
}
