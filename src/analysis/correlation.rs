//! Rolling and full-period correlation.
//!
//! - Rolling correlations run on return series (already aligned and gap-free
//!   upstream) over a trailing window of validated size.
//! - The full-period matrix runs on raw levels of the aligned table.
//!
//! Cells that cannot be computed stay missing; they are never reported as 0.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::analysis::error::{AnalysisError, Result};
use crate::domain::{AlignedTable, TimeSeries};
use crate::math::{is_constant, pearson};

/// A validated rolling window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow(usize);

impl RollingWindow {
    pub const MIN: usize = 30;
    pub const MAX: usize = 180;

    pub fn new(size: usize) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&size) {
            return Err(AnalysisError::InvalidWindow {
                size,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// Trailing-window Pearson correlation of two series on the same date index.
///
/// Position `i` covers rows `i + 1 - window ..= i`. It is missing for the first
/// `window - 1` positions, for windows that contain a missing value, and for
/// windows where either side is constant.
pub fn rolling_correlation(a: &TimeSeries, b: &TimeSeries, window: RollingWindow) -> Result<TimeSeries> {
    if !a.same_index(b) {
        return Err(AnalysisError::IndexMismatch {
            left: a.name.clone(),
            right: b.name.clone(),
        });
    }

    let w = window.get();
    let mut xs = Vec::with_capacity(w);
    let mut ys = Vec::with_capacity(w);
    let values = (0..a.len())
        .map(|i| {
            if i + 1 < w {
                return None;
            }
            xs.clear();
            ys.clear();
            for j in (i + 1 - w)..=i {
                xs.push(a.values[j]?);
                ys.push(b.values[j]?);
            }
            pearson(&xs, &ys)
        })
        .collect();

    Ok(TimeSeries::new(
        format!("{}/{}", a.name, b.name),
        a.dates.clone(),
        values,
    ))
}

/// An ordered pair of column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesPair {
    pub left: String,
    pub right: String,
}

impl SeriesPair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} ↔ {}", self.left, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RollingCorrelation {
    pub pair: SeriesPair,
    pub series: TimeSeries,
}

/// Rolling correlations keyed by pair, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationSet {
    pub entries: Vec<RollingCorrelation>,
}

impl CorrelationSet {
    pub fn get(&self, left: &str, right: &str) -> Option<&TimeSeries> {
        self.entries
            .iter()
            .find(|e| e.pair.left == left && e.pair.right == right)
            .map(|e| &e.series)
    }

    /// Latest value for a pair; `None` when the pair is unknown or the last window is undefined.
    pub fn latest(&self, left: &str, right: &str) -> Option<f64> {
        self.get(left, right).and_then(TimeSeries::latest)
    }
}

/// Evaluate several pairs over the same return table.
///
/// Pairs are independent, so they are computed in parallel; output order
/// follows `pairs`.
pub fn rolling_correlations(
    returns: &AlignedTable,
    pairs: &[SeriesPair],
    window: RollingWindow,
) -> Result<CorrelationSet> {
    let entries = pairs
        .par_iter()
        .map(|pair| -> Result<RollingCorrelation> {
            let a = returns
                .series(&pair.left)
                .ok_or_else(|| AnalysisError::missing(&pair.left))?;
            let b = returns
                .series(&pair.right)
                .ok_or_else(|| AnalysisError::missing(&pair.right))?;
            Ok(RollingCorrelation {
                pair: pair.clone(),
                series: rolling_correlation(&a, &b, window)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorrelationSet { entries })
}

/// Full-period correlation matrix. Missing cells are stored as `NaN` and
/// surfaced as `None` through [`CorrelationMatrix::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.at(i, j)
    }

    pub fn at(&self, i: usize, j: usize) -> Option<f64> {
        let v = *self.values.get((i, j))?;
        v.is_finite().then_some(v)
    }

    /// Row-major copy with missing cells as `None`.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.dim())
            .map(|i| (0..self.dim()).map(|j| self.at(i, j)).collect())
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.dim()).all(|i| (0..self.dim()).all(|j| self.at(i, j) == self.at(j, i)))
    }
}

/// Pearson correlation of raw column levels over the whole table.
pub fn full_correlation(table: &AlignedTable, columns: &[&str]) -> Result<CorrelationMatrix> {
    let data = columns
        .iter()
        .map(|name| table.column(name).ok_or_else(|| AnalysisError::missing(name)))
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut values = DMatrix::from_element(n, n, f64::NAN);
    for i in 0..n {
        if data[i].len() >= 2 && !is_constant(data[i]) {
            values[(i, i)] = 1.0;
        }
        for j in (i + 1)..n {
            if let Some(r) = pearson(data[i], data[j]) {
                values[(i, j)] = r;
                values[(j, i)] = r;
            }
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use super::*;
    use crate::domain::Column;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 0.01).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn window_bounds_are_enforced() {
        assert!(RollingWindow::new(30).is_ok());
        assert!(RollingWindow::new(180).is_ok());
        assert!(matches!(
            RollingWindow::new(29),
            Err(AnalysisError::InvalidWindow { size: 29, .. })
        ));
        assert!(RollingWindow::new(181).is_err());
    }

    #[test]
    fn first_window_minus_one_positions_are_missing() {
        let n = 200;
        let a = TimeSeries::from_values("A", dates(n), &noise(n, 1));
        let b = TimeSeries::from_values("B", dates(n), &noise(n, 2));
        let corr = rolling_correlation(&a, &b, RollingWindow::new(90).unwrap()).unwrap();

        assert_eq!(corr.len(), n);
        assert!(corr.values[..89].iter().all(Option::is_none));
        for v in &corr.values[89..] {
            let r = v.expect("defined after the first full window");
            assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn window_with_gap_is_missing() {
        let n = 40;
        let mut values: Vec<Option<f64>> = noise(n, 3).into_iter().map(Some).collect();
        values[35] = None;
        let a = TimeSeries::new("A", dates(n), values);
        let b = TimeSeries::from_values("B", dates(n), &noise(n, 4));
        let corr = rolling_correlation(&a, &b, RollingWindow::new(30).unwrap()).unwrap();
        assert!(corr.values[29].is_some());
        assert!(corr.values[35..].iter().all(Option::is_none));
    }

    #[test]
    fn mismatched_indexes_are_rejected() {
        let a = TimeSeries::from_values("A", dates(40), &noise(40, 5));
        let b = TimeSeries::from_values("B", dates(41)[1..].to_vec(), &noise(40, 6));
        assert!(matches!(
            rolling_correlation(&a, &b, RollingWindow::new(30).unwrap()),
            Err(AnalysisError::IndexMismatch { .. })
        ));
    }

    #[test]
    fn rolling_set_keeps_request_order() {
        let n = 60;
        let table = AlignedTable::from_parts(
            dates(n),
            vec![
                Column { name: "A".into(), values: noise(n, 7) },
                Column { name: "B".into(), values: noise(n, 8) },
                Column { name: "C".into(), values: noise(n, 9) },
            ],
        );
        let pairs = [SeriesPair::new("C", "A"), SeriesPair::new("A", "B")];
        let set = rolling_correlations(&table, &pairs, RollingWindow::new(30).unwrap()).unwrap();
        assert_eq!(set.entries[0].pair, pairs[0]);
        assert_eq!(set.entries[1].pair, pairs[1]);
        assert!(set.latest("A", "B").is_some());
        assert!(set.latest("B", "A").is_none());

        let missing = [SeriesPair::new("A", "Z")];
        assert!(rolling_correlations(&table, &missing, RollingWindow::new(30).unwrap()).is_err());
    }

    #[test]
    fn full_matrix_is_symmetric_with_unit_diagonal() {
        let n = 50;
        let x = noise(n, 10);
        let y: Vec<f64> = x.iter().zip(noise(n, 11)).map(|(a, b)| a + b).collect();
        let table = AlignedTable::from_parts(
            dates(n),
            vec![
                Column { name: "X".into(), values: x },
                Column { name: "Y".into(), values: y },
                Column { name: "Z".into(), values: noise(n, 12) },
            ],
        );
        let m = full_correlation(&table, &["X", "Y", "Z"]).unwrap();
        assert!(m.is_symmetric());
        for i in 0..m.dim() {
            assert_eq!(m.at(i, i), Some(1.0));
        }
        assert!(m.get("X", "Y").unwrap() > 0.3);
    }

    #[test]
    fn constant_column_yields_missing_cells() {
        let n = 10;
        let table = AlignedTable::from_parts(
            dates(n),
            vec![
                Column { name: "X".into(), values: noise(n, 13) },
                Column { name: "FLAT".into(), values: vec![1.0; n] },
            ],
        );
        let m = full_correlation(&table, &["X", "FLAT"]).unwrap();
        assert_eq!(m.get("X", "FLAT"), None);
        assert_eq!(m.get("FLAT", "FLAT"), None);
        assert_eq!(m.get("X", "X"), Some(1.0));
    }
}
