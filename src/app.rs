//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - fetches FRED data (or synthesizes it) through the series cache
//! - runs the analysis pipeline
//! - prints reports and writes optional exports / narrative commentary

use std::time::Duration as StdDuration;

use chrono::{Duration, Local};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RunArgs, WatchArgs};
use crate::data::SeriesCache;
use crate::domain::{AnalysisConfig, LookbackWindow};
use crate::error::{AppError, EXIT_CONFIG};
use crate::narrative::{GeminiClient, PromptSections, narrate};

pub mod pipeline;

use pipeline::{DataSource, RunOutput};

/// Entry point for the `liq` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `liq` and `liq --demo` behave like `liq report ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_run(&args, OutputMode::Full),
        Command::Score(args) => handle_run(&args, OutputMode::ScoreOnly),
        Command::Matrix(args) => handle_run(&args, OutputMode::Matrix),
        Command::Watch(args) => handle_watch(&args),
    }
}

fn init_tracing() {
    // Logs go to stderr so report output on stdout stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ScoreOnly,
    Matrix,
}

fn handle_run(args: &RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analysis_config_from_args(args)?;
    let mut cache = SeriesCache::default();
    let run = pipeline::run(data_source(args), &config, &mut cache)?;
    present(&run, &config, args, mode)
}

fn handle_watch(args: &WatchArgs) -> Result<(), AppError> {
    if args.cache_ttl <= 0 {
        return Err(AppError::new(EXIT_CONFIG, "Cache TTL must be > 0 seconds."));
    }
    let mut cache = SeriesCache::new(Duration::seconds(args.cache_ttl));
    let source = data_source(&args.run);

    let mut iteration = 0usize;
    loop {
        iteration += 1;
        // Re-resolve the as-of date each time so a long-running watch rolls over at midnight.
        let config = analysis_config_from_args(&args.run)?;
        info!(iteration, as_of = %config.lookback.as_of, "watch run");

        match pipeline::run(source, &config, &mut cache) {
            Ok(run) => present(&run, &config, &args.run, OutputMode::Full)?,
            // Keep watching through transient service failures; configuration errors end the loop.
            Err(err) if err.exit_code() != EXIT_CONFIG => warn!(%err, "watch run failed"),
            Err(err) => return Err(err),
        }

        if args.iterations.is_some_and(|n| iteration >= n) {
            return Ok(());
        }
        std::thread::sleep(StdDuration::from_secs(args.interval));
    }
}

fn present(run: &RunOutput, config: &AnalysisConfig, args: &RunArgs, mode: OutputMode) -> Result<(), AppError> {
    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_run_summary(&run.summary, &run.output, config)
            );
        }
        OutputMode::ScoreOnly => {
            print!("{}", crate::report::format_score(&run.output.score));
        }
        OutputMode::Matrix => {
            print!("{}", crate::report::format_matrix(&run.output.matrix));
        }
    }

    // Optional export.
    if let Some(path) = &args.export {
        let report = crate::io::ReportFile::new(&run.summary, &run.output, config);
        crate::io::write_report_json(path, &report)?;
        info!(path = %path.display(), "report exported");
    }

    // Optional narrative commentary.
    if let Some(kind) = args.narrate {
        let data = crate::report::format_data_summary(&run.summary);
        let correlations = crate::report::format_correlation_summary(&run.output);
        let signals = crate::report::format_signals_summary(&run.output.readings, config);
        let sections = PromptSections {
            data: &data,
            correlations: &correlations,
            signals: &signals,
        };
        let client = GeminiClient::from_env()?;
        let text = narrate(&client, kind, &sections)?;
        println!("\n--- AI commentary ({kind:?}) ---\n{text}");
    }

    Ok(())
}

fn data_source(args: &RunArgs) -> DataSource {
    if args.demo {
        DataSource::Demo { seed: args.seed }
    } else {
        DataSource::Fred
    }
}

pub fn analysis_config_from_args(args: &RunArgs) -> Result<AnalysisConfig, AppError> {
    if args.days == 0 {
        return Err(AppError::new(EXIT_CONFIG, "Lookback days must be > 0."));
    }
    if args.divergence_lag == 0 || args.divergence_lookback == 0 || args.liquidity_periods == 0 {
        return Err(AppError::new(
            EXIT_CONFIG,
            "Divergence lag/lookback and liquidity periods must be > 0.",
        ));
    }
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    Ok(AnalysisConfig {
        lookback: LookbackWindow::new(as_of, args.days),
        window: args.window,
        liquidity_periods: args.liquidity_periods,
        divergence_lag: args.divergence_lag,
        divergence_lookback: args.divergence_lookback,
    })
}

/// Rewrite argv so `liq` defaults to `liq report`.
///
/// Rules:
/// - `liq`                      -> `liq report`
/// - `liq --demo ...`           -> `liq report --demo ...`
/// - `liq --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "score" | "matrix" | "watch");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "report flags".
    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["liq"])), argv(&["liq", "report"]));
        assert_eq!(
            rewrite_args(argv(&["liq", "--demo", "-w", "60"])),
            argv(&["liq", "report", "--demo", "-w", "60"])
        );
        assert_eq!(rewrite_args(argv(&["liq", "--help"])), argv(&["liq", "--help"]));
        assert_eq!(rewrite_args(argv(&["liq", "score"])), argv(&["liq", "score"]));
    }

    #[test]
    fn config_from_args_uses_explicit_as_of() {
        let cli = crate::cli::Cli::parse_from(["liq", "report", "--as-of", "2024-12-31", "--days", "365"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let config = analysis_config_from_args(&args).unwrap();
        assert_eq!(config.lookback.as_of, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(config.lookback.start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.window, 90);
    }

    #[test]
    fn zero_lag_is_rejected() {
        let cli = crate::cli::Cli::parse_from(["liq", "report", "--divergence-lag", "0"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(analysis_config_from_args(&args).unwrap_err().exit_code(), EXIT_CONFIG);
    }
}
