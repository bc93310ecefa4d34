//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built by the FRED client or the synthetic sample generator
//! - transformed by the analysis core without copying more than needed
//! - summarized into reports and JSON exports

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Column holding the derived net liquidity measure.
pub const NET_LIQUIDITY: &str = "NetLiq";

/// The FRED sources the pipeline knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// Fed total assets (millions of USD, weekly).
    Walcl,
    /// Treasury General Account (millions of USD, weekly).
    Tga,
    /// Overnight reverse repo (billions of USD, daily).
    Rrp,
    /// Broad trade-weighted dollar index.
    Dxy,
    /// ICE BofA US high-yield OAS (percent).
    HySpread,
    Btc,
    Nasdaq,
    Sp500,
}

impl Symbol {
    pub const ALL: [Symbol; 8] = [
        Symbol::Walcl,
        Symbol::Tga,
        Symbol::Rrp,
        Symbol::Dxy,
        Symbol::HySpread,
        Symbol::Btc,
        Symbol::Nasdaq,
        Symbol::Sp500,
    ];

    /// FRED series identifier.
    pub fn series_id(self) -> &'static str {
        match self {
            Symbol::Walcl => "WALCL",
            Symbol::Tga => "WTREGEN",
            Symbol::Rrp => "RRPONTSYD",
            Symbol::Dxy => "DTWEXAFEGS",
            Symbol::HySpread => "BAMLH0A0HYM2",
            Symbol::Btc => "CBBTCUSD",
            Symbol::Nasdaq => "NASDAQCOM",
            Symbol::Sp500 => "SP500",
        }
    }

    /// Column name used in aligned tables.
    pub fn column(self) -> &'static str {
        match self {
            Symbol::Walcl => "WALCL",
            Symbol::Tga => "TGA",
            Symbol::Rrp => "RRP",
            Symbol::Dxy => "DXY",
            Symbol::HySpread => "HYSpread",
            Symbol::Btc => "BTC",
            Symbol::Nasdaq => "NASDAQ",
            Symbol::Sp500 => "SP500",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Symbol::Walcl => "Fed total assets",
            Symbol::Tga => "Treasury General Account",
            Symbol::Rrp => "Reverse repo",
            Symbol::Dxy => "Dollar index",
            Symbol::HySpread => "HY spread",
            Symbol::Btc => "Bitcoin",
            Symbol::Nasdaq => "NASDAQ",
            Symbol::Sp500 => "S&P 500",
        }
    }
}

/// Raw observations for one source, as handed over by a retrieval layer.
///
/// Dates may be unsorted, sparse, or disagree with other sources; values may
/// be missing on any date.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub name: String,
    pub observations: Vec<(NaiveDate, Option<f64>)>,
}

impl RawSeries {
    pub fn new(name: impl Into<String>, observations: Vec<(NaiveDate, Option<f64>)>) -> Self {
        Self {
            name: name.into(),
            observations,
        }
    }
}

/// A named, date-indexed series where `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            name: name.into(),
            dates,
            values,
        }
    }

    /// Build a fully populated series.
    pub fn from_values(name: impl Into<String>, dates: Vec<NaiveDate>, values: &[f64]) -> Self {
        Self::new(name, dates, values.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at the last date (`None` if the series is empty or the last value is missing).
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn same_index(&self, other: &TimeSeries) -> bool {
        self.dates == other.dates
    }

    /// Present values only, in date order.
    pub fn present(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| *v).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// A regular table: ascending unique dates and fully populated columns.
///
/// Construction goes through the aligner (or other analysis routines) so every
/// column always has exactly one value per date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl AlignedTable {
    pub(crate) fn from_parts(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == dates.len()));
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        Self { dates, columns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn series(&self, name: &str) -> Option<TimeSeries> {
        self.column(name)
            .map(|values| TimeSeries::from_values(name, self.dates.clone(), values))
    }

    pub fn latest(&self, name: &str) -> Option<f64> {
        self.column(name).and_then(|v| v.last().copied())
    }

    /// Return a new table with `name` appended, replacing any existing column of that name.
    pub fn with_column(&self, name: &str, values: Vec<f64>) -> AlignedTable {
        debug_assert_eq!(values.len(), self.dates.len());
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();
        columns.push(Column {
            name: name.to_string(),
            values,
        });
        AlignedTable::from_parts(self.dates.clone(), columns)
    }
}

/// Inclusive date range `[as_of - days, as_of]` used to restrict alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub as_of: NaiveDate,
    pub days: u32,
}

impl LookbackWindow {
    pub fn new(as_of: NaiveDate, days: u32) -> Self {
        Self { as_of, days }
    }

    pub fn start(&self) -> NaiveDate {
        self.as_of
            .checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.as_of
    }
}

/// Which canned narrative request to send to the language-model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeKind {
    /// Whole-market overview: macro summary, risks, strategy.
    Overview,
    /// Net liquidity and Fed policy read.
    Liquidity,
    /// Dollar strength versus risk assets.
    Dollar,
    /// Credit market state from the HY spread.
    Credit,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub lookback: LookbackWindow,
    /// Rolling correlation window (rows); validated to 30..=180 by the core.
    pub window: usize,
    /// Trailing rows used for the net liquidity change reading.
    pub liquidity_periods: usize,
    /// Lag (rows) for the divergence signals.
    pub divergence_lag: usize,
    /// Number of most recent rows scanned for divergences.
    pub divergence_lookback: usize,
}

impl AnalysisConfig {
    pub const DEFAULT_DAYS: u32 = 365 * 3;
    pub const DEFAULT_WINDOW: usize = 90;
    pub const DEFAULT_LIQUIDITY_PERIODS: usize = 60;
    pub const DEFAULT_DIVERGENCE_LAG: usize = 20;
    pub const DEFAULT_DIVERGENCE_LOOKBACK: usize = 5;

    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            lookback: LookbackWindow::new(as_of, Self::DEFAULT_DAYS),
            window: Self::DEFAULT_WINDOW,
            liquidity_periods: Self::DEFAULT_LIQUIDITY_PERIODS,
            divergence_lag: Self::DEFAULT_DIVERGENCE_LAG,
            divergence_lookback: Self::DEFAULT_DIVERGENCE_LOOKBACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn lookback_window_is_inclusive_on_both_ends() {
        let w = LookbackWindow::new(d(2025, 1, 31), 30);
        assert_eq!(w.start(), d(2025, 1, 1));
        assert!(w.contains(d(2025, 1, 1)));
        assert!(w.contains(d(2025, 1, 31)));
        assert!(!w.contains(d(2024, 12, 31)));
        assert!(!w.contains(d(2025, 2, 1)));
    }

    #[test]
    fn with_column_replaces_existing_name() {
        let dates = vec![d(2025, 1, 1), d(2025, 1, 2)];
        let table = AlignedTable::from_parts(
            dates,
            vec![Column {
                name: "A".to_string(),
                values: vec![1.0, 2.0],
            }],
        );
        let t2 = table.with_column("B", vec![3.0, 4.0]).with_column("B", vec![5.0, 6.0]);
        assert_eq!(t2.column_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(t2.column("B"), Some(&[5.0, 6.0][..]));
        // Original table is untouched.
        assert!(table.column("B").is_none());
    }

    #[test]
    fn series_ids_are_unique() {
        let mut ids: Vec<&str> = Symbol::ALL.iter().map(|s| s.series_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Symbol::ALL.len());
    }
}
