//! Reporting utilities: latest-level metrics and formatted terminal output.

pub mod format;

pub use format::*;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::{AnalysisOutput, percent_change};
use crate::domain::{AnalysisConfig, NET_LIQUIDITY, Symbol};
use crate::math::sample_std;

/// Trailing rows for the market change column.
pub const MARKET_CHANGE_PERIODS: usize = 30;
/// Trailing daily returns used for realized volatility.
pub const VOLATILITY_PERIODS: usize = 90;

/// One line of the data summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetLine {
    pub column: String,
    pub label: String,
    pub latest: f64,
    /// Percent change over `change_periods` rows.
    pub change_pct: Option<f64>,
    pub change_periods: usize,
    /// Std dev of the last daily returns, in percent.
    pub volatility_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rows: usize,
    pub assets: Vec<AssetLine>,
}

impl MarketSummary {
    pub fn asset(&self, column: &str) -> Option<&AssetLine> {
        self.assets.iter().find(|a| a.column == column)
    }
}

/// Latest levels, trailing changes and realized volatility for each tracked column.
///
/// Returns `None` only for an empty table, which the aligner never produces.
pub fn summarize(output: &AnalysisOutput, config: &AnalysisConfig) -> Option<MarketSummary> {
    let table = &output.table;
    let lines = [
        (NET_LIQUIDITY, "Net liquidity", config.liquidity_periods),
        (Symbol::Btc.column(), Symbol::Btc.display_name(), MARKET_CHANGE_PERIODS),
        (Symbol::Nasdaq.column(), Symbol::Nasdaq.display_name(), MARKET_CHANGE_PERIODS),
        (Symbol::Sp500.column(), Symbol::Sp500.display_name(), MARKET_CHANGE_PERIODS),
        (Symbol::Dxy.column(), Symbol::Dxy.display_name(), MARKET_CHANGE_PERIODS),
        (Symbol::HySpread.column(), Symbol::HySpread.display_name(), MARKET_CHANGE_PERIODS),
    ];

    let assets = lines
        .iter()
        .filter_map(|&(column, label, periods)| {
            let series = table.series(column)?;
            let latest = series.latest()?;
            let change_pct = percent_change(&series, periods).latest().map(|v| v * 100.0);

            let daily: Vec<f64> = percent_change(&series, 1).present();
            let tail = &daily[daily.len().saturating_sub(VOLATILITY_PERIODS)..];
            let volatility_pct = sample_std(tail).map(|v| v * 100.0);

            Some(AssetLine {
                column: column.to_string(),
                label: label.to_string(),
                latest,
                change_pct,
                change_periods: periods,
                volatility_pct,
            })
        })
        .collect();

    Some(MarketSummary {
        first_date: table.first_date()?,
        last_date: table.last_date()?,
        rows: table.len(),
        assets,
    })
}
