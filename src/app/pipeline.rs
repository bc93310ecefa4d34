//! Shared "analysis pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (or cache / synthesize) -> analyze -> summarize
//!
//! The subcommands can then focus on presentation.

use chrono::Utc;
use tracing::{debug, info};

use crate::analysis::{AnalysisOutput, analyze};
use crate::data::{CacheKey, FredClient, SeriesCache, generate_sample};
use crate::domain::{AnalysisConfig, RawSeries, Symbol};
use crate::error::{AppError, EXIT_ANALYSIS};
use crate::report::{MarketSummary, summarize};

/// Where raw series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Fred,
    Demo { seed: u64 },
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub output: AnalysisOutput,
    pub summary: MarketSummary,
}

/// Load raw series for `config`, going through `cache` first.
pub fn load_series(
    source: DataSource,
    config: &AnalysisConfig,
    cache: &mut SeriesCache,
) -> Result<Vec<RawSeries>, AppError> {
    let symbols: Vec<&str> = Symbol::ALL.iter().map(|s| s.column()).collect();
    let key = CacheKey::new(&symbols, config.lookback.days, config.lookback.as_of);
    let now = Utc::now();

    let purged = cache.purge_expired(now);
    if purged > 0 {
        debug!(purged, "dropped expired cache entries");
    }

    let (series, hit) = cache.get_or_try_insert::<AppError>(key, now, || match source {
        DataSource::Fred => {
            let client = FredClient::from_env()?;
            client.fetch_all(config.lookback.start())
        }
        DataSource::Demo { seed } => generate_sample(&config.lookback, seed),
    })?;
    info!(hit, series = series.len(), ?source, "raw series ready");
    Ok(series.to_vec())
}

/// Execute the analysis with pre-fetched series.
pub fn run_with_series(raw: &[RawSeries], config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let output = analyze(raw, config)?;
    info!(
        rows = output.table.len(),
        return_rows = output.returns.len(),
        score = output.score.score,
        label = %output.score.label,
        "analysis complete"
    );

    let summary = summarize(&output, config)
        .ok_or_else(|| AppError::new(EXIT_ANALYSIS, "Aligned table is empty."))?;

    Ok(RunOutput { output, summary })
}

/// Load and analyze in one step.
pub fn run(source: DataSource, config: &AnalysisConfig, cache: &mut SeriesCache) -> Result<RunOutput, AppError> {
    let raw = load_series(source, config, cache)?;
    run_with_series(&raw, config)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::analysis::SignalLabel;
    use crate::analysis::score::{SCORE_MAX, SCORE_MIN};
    use crate::domain::NET_LIQUIDITY;
    use crate::io::{ReportFile, write_report_json};

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    #[test]
    fn demo_run_produces_complete_output() {
        let config = config();
        let mut cache = SeriesCache::default();
        let run = run(DataSource::Demo { seed: 42 }, &config, &mut cache).unwrap();
        let out = &run.output;

        // Aligned columns share the index and include the derived measure.
        assert!(out.table.len() > 500);
        for col in out.table.columns() {
            assert_eq!(col.values.len(), out.table.len());
        }
        assert!(out.table.column(NET_LIQUIDITY).is_some());

        // Rolling correlations: first window - 1 rows missing, the rest bounded.
        let dxy_btc = out.rolling.get("DXY", "BTC").unwrap();
        assert_eq!(dxy_btc.len(), out.returns.len());
        assert!(dxy_btc.values[..config.window - 1].iter().all(Option::is_none));
        assert!(
            dxy_btc.values[config.window - 1..]
                .iter()
                .flatten()
                .all(|r| (-1.0..=1.0).contains(r))
        );

        assert!(out.matrix.is_symmetric());
        assert!((SCORE_MIN..=SCORE_MAX).contains(&out.score.score));
        assert_eq!(out.score.label, SignalLabel::from_score(out.score.score));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn second_load_within_ttl_hits_the_cache() {
        let config = config();
        let mut cache = SeriesCache::default();
        let first = load_series(DataSource::Demo { seed: 1 }, &config, &mut cache).unwrap();
        // A different seed would produce different data, so equality proves a cache hit.
        let second = load_series(DataSource::Demo { seed: 2 }, &config, &mut cache).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rerunning_is_deterministic() {
        let config = config();
        let raw = generate_sample(&config.lookback, 9).unwrap();
        let a = run_with_series(&raw, &config).unwrap();
        let b = run_with_series(&raw, &config).unwrap();
        assert_eq!(a.output, b.output);
    }

    #[test]
    fn invalid_window_maps_to_analysis_exit_code() {
        let mut config = config();
        config.window = 200;
        let raw = generate_sample(&config.lookback, 3).unwrap();
        let err = run_with_series(&raw, &config).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_ANALYSIS);
    }

    #[test]
    fn report_json_round_trips_through_serde_value() {
        let config = config();
        let raw = generate_sample(&config.lookback, 5).unwrap();
        let run = run_with_series(&raw, &config).unwrap();

        let path = std::env::temp_dir().join(format!("liq_report_{}.json", std::process::id()));
        let report = ReportFile::new(&run.summary, &run.output, &config);
        write_report_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["tool"], "liq");
        assert_eq!(json["score"]["score"], run.output.score.score);
        assert_eq!(json["matrix"]["columns"].as_array().unwrap().len(), 6);
        assert_eq!(json["rolling_latest"].as_array().unwrap().len(), 4);
    }
}
