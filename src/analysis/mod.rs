//! The derivation-and-scoring core.
//!
//! Stages run strictly in order:
//!
//! raw series -> `align` -> `liquidity` -> {`returns`, `correlation`, `divergence`} -> `score`
//!
//! Every stage is a pure function of its arguments: no I/O, no logging, no
//! state carried between calls. Fetching, caching and presentation live in the
//! `data`, `report` and `app` modules.

pub mod align;
pub mod correlation;
pub mod divergence;
pub mod error;
pub mod liquidity;
pub mod returns;
pub mod score;

pub use align::align;
pub use correlation::{
    CorrelationMatrix, CorrelationSet, RollingCorrelation, RollingWindow, SeriesPair,
    full_correlation, rolling_correlation, rolling_correlations,
};
pub use divergence::DivergenceFlags;
pub use error::{AnalysisError, Result};
pub use liquidity::derive_net_liquidity;
pub use returns::{difference, percent_change, return_table, zscore, zscore_table};
pub use score::{CompositeScore, Contributions, SignalLabel, SignalReadings, score};

use crate::domain::{AlignedTable, AnalysisConfig, NET_LIQUIDITY, RawSeries, Symbol};

/// Columns whose daily returns feed the rolling correlations.
pub const RETURN_COLUMNS: [&str; 6] = [
    NET_LIQUIDITY,
    "BTC",
    "NASDAQ",
    "DXY",
    "HYSpread",
    "SP500",
];

/// Columns of the full-period correlation matrix.
pub const MATRIX_COLUMNS: [&str; 6] = [
    NET_LIQUIDITY,
    "DXY",
    "HYSpread",
    "BTC",
    "NASDAQ",
    "SP500",
];

/// Columns standardized for side-by-side comparison.
pub const ZSCORE_COLUMNS: [&str; 4] = [NET_LIQUIDITY, "BTC", "NASDAQ", "DXY"];

/// Rolling pairs: liquidity vs risk assets, dollar vs bitcoin, spread vs equities.
pub fn rolling_pairs() -> Vec<SeriesPair> {
    vec![
        SeriesPair::new(NET_LIQUIDITY, Symbol::Btc.column()),
        SeriesPair::new(NET_LIQUIDITY, Symbol::Nasdaq.column()),
        SeriesPair::new(Symbol::Dxy.column(), Symbol::Btc.column()),
        SeriesPair::new(Symbol::HySpread.column(), Symbol::Sp500.column()),
    ]
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    /// Aligned raw columns plus `NetLiq`.
    pub table: AlignedTable,
    /// One-period returns of [`RETURN_COLUMNS`], gap-free.
    pub returns: AlignedTable,
    /// Whole-sample z-scores of [`ZSCORE_COLUMNS`].
    pub zscores: AlignedTable,
    pub rolling: CorrelationSet,
    pub matrix: CorrelationMatrix,
    pub divergence: DivergenceFlags,
    pub readings: SignalReadings,
    pub score: CompositeScore,
}

/// Run the full pipeline over raw series.
pub fn analyze(raw: &[RawSeries], config: &AnalysisConfig) -> Result<AnalysisOutput> {
    let window = RollingWindow::new(config.window)?;

    let aligned = align(raw, &config.lookback)?;
    let table = derive_net_liquidity(&aligned)?;

    let returns = return_table(&table, &RETURN_COLUMNS, 1)?;
    let zscores = zscore_table(&table, &ZSCORE_COLUMNS)?;
    let rolling = rolling_correlations(&returns, &rolling_pairs(), window)?;
    let matrix = full_correlation(&table, &MATRIX_COLUMNS)?;

    let series = |symbol: Symbol| {
        table
            .series(symbol.column())
            .ok_or_else(|| AnalysisError::missing(symbol.column()))
    };
    let divergence = DivergenceFlags::detect(
        &series(Symbol::Sp500)?,
        &series(Symbol::HySpread)?,
        config.divergence_lag,
    )?;

    let liquidity = table
        .series(NET_LIQUIDITY)
        .ok_or_else(|| AnalysisError::missing(NET_LIQUIDITY))?;
    let readings = SignalReadings {
        liquidity_change_pct: percent_change(&liquidity, config.liquidity_periods)
            .latest()
            .map(|v| v * 100.0),
        currency_risk_correlation: rolling.latest(Symbol::Dxy.column(), Symbol::Btc.column()),
        credit_spread: table.latest(Symbol::HySpread.column()),
        divergence_count: divergence.recent_count(config.divergence_lookback),
    };
    let score = score(&readings);

    Ok(AnalysisOutput {
        table,
        returns,
        zscores,
        rolling,
        matrix,
        divergence,
        readings,
        score,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn window_is_validated_before_any_work() {
        let mut config = AnalysisConfig::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        config.window = 10;
        // Empty input would otherwise fail alignment first.
        assert!(matches!(
            analyze(&[], &config),
            Err(AnalysisError::InvalidWindow { size: 10, .. })
        ));
    }

    #[test]
    fn missing_component_surfaces_from_derivation() {
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let raw = vec![
            RawSeries::new("WALCL", vec![(as_of, Some(1.0))]),
            RawSeries::new("TGA", vec![(as_of, Some(1.0))]),
        ];
        assert_eq!(
            analyze(&raw, &AnalysisConfig::new(as_of)),
            Err(AnalysisError::MissingComponent {
                column: "RRP".to_string()
            })
        );
    }
}
