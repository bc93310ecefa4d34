//! Divergence between a risk asset and a credit spread.
//!
//! A divergence is a date where the risk asset is up over the lag *and* the
//! spread has widened over the same lag. The two signals are deliberately kept
//! in their own units: a percent return on one side, a raw level change on the
//! other.

use chrono::NaiveDate;

use crate::analysis::error::{AnalysisError, Result};
use crate::analysis::returns::{difference, percent_change};
use crate::domain::TimeSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceFlags {
    pub dates: Vec<NaiveDate>,
    pub flags: Vec<bool>,
}

impl DivergenceFlags {
    /// Flags from a price series `a` and a spread series `b` over `lag` rows.
    pub fn detect(a: &TimeSeries, b: &TimeSeries, lag: usize) -> Result<Self> {
        Self::from_signals(&percent_change(a, lag), &difference(b, lag))
    }

    /// Flags from precomputed signals; a missing signal never flags.
    pub fn from_signals(signal_a: &TimeSeries, signal_b: &TimeSeries) -> Result<Self> {
        if !signal_a.same_index(signal_b) {
            return Err(AnalysisError::IndexMismatch {
                left: signal_a.name.clone(),
                right: signal_b.name.clone(),
            });
        }
        let flags = signal_a
            .values
            .iter()
            .zip(&signal_b.values)
            .map(|(a, b)| matches!((a, b), (Some(a), Some(b)) if *a > 0.0 && *b > 0.0))
            .collect();
        Ok(Self {
            dates: signal_a.dates.clone(),
            flags,
        })
    }

    /// Number of flagged rows among the last `lookback` rows.
    pub fn recent_count(&self, lookback: usize) -> usize {
        let start = self.flags.len().saturating_sub(lookback);
        self.flags[start..].iter().filter(|f| **f).count()
    }

    /// Flagged dates among the last `lookback` rows.
    pub fn recent_dates(&self, lookback: usize) -> Vec<NaiveDate> {
        let start = self.flags.len().saturating_sub(lookback);
        self.dates[start..]
            .iter()
            .zip(&self.flags[start..])
            .filter_map(|(d, f)| f.then_some(*d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    #[test]
    fn counts_simultaneous_rises() {
        let ret_a = TimeSeries::from_values("SP500", dates(5), &[0.01, 0.01, -0.01, 0.01, 0.01]);
        let chg_b = TimeSeries::from_values("HYSpread", dates(5), &[0.1, 0.1, 0.1, -0.1, 0.1]);
        let flags = DivergenceFlags::from_signals(&ret_a, &chg_b).unwrap();
        assert_eq!(flags.recent_count(5), 3);
        assert_eq!(flags.recent_dates(5), vec![dates(5)[0], dates(5)[1], dates(5)[4]]);
        assert_eq!(flags.recent_count(2), 1);
    }

    #[test]
    fn detect_uses_return_and_difference() {
        // A rises 10% over two rows, B widens by 0.5 over two rows at the end.
        let a = TimeSeries::from_values("A", dates(4), &[100.0, 100.0, 110.0, 90.0]);
        let b = TimeSeries::from_values("B", dates(4), &[4.0, 4.0, 4.5, 4.5]);
        let flags = DivergenceFlags::detect(&a, &b, 2).unwrap();
        assert_eq!(flags.flags, vec![false, false, true, false]);
    }

    #[test]
    fn short_history_counts_zero() {
        let a = TimeSeries::from_values("A", dates(5), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = TimeSeries::from_values("B", dates(5), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let flags = DivergenceFlags::detect(&a, &b, 20).unwrap();
        assert_eq!(flags.recent_count(5), 0);
    }

    #[test]
    fn mismatched_index_is_rejected() {
        let a = TimeSeries::from_values("A", dates(3), &[1.0, 2.0, 3.0]);
        let b = TimeSeries::from_values("B", dates(4)[1..].to_vec(), &[1.0, 2.0, 3.0]);
        assert!(DivergenceFlags::detect(&a, &b, 1).is_err());
    }
}
