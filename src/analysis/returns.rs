//! Returns, differences and standardization.
//!
//! All transforms keep the input's date index; positions that cannot be
//! computed are `None` and are never filled with zero.

use crate::analysis::error::{AnalysisError, Result};
use crate::domain::{AlignedTable, Column, TimeSeries};
use crate::math::{is_constant, mean, sample_std};

/// `(v[i] - v[i - periods]) / v[i - periods]`.
///
/// Missing for the first `periods` positions, when either operand is missing,
/// and when the base value is zero.
pub fn percent_change(series: &TimeSeries, periods: usize) -> TimeSeries {
    lagged(series, periods, |prev, cur| {
        if prev == 0.0 {
            None
        } else {
            Some((cur - prev) / prev)
        }
    })
}

/// `v[i] - v[i - periods]`, missing for the first `periods` positions.
pub fn difference(series: &TimeSeries, periods: usize) -> TimeSeries {
    lagged(series, periods, |prev, cur| Some(cur - prev))
}

fn lagged(series: &TimeSeries, periods: usize, f: impl Fn(f64, f64) -> Option<f64>) -> TimeSeries {
    let values = (0..series.len())
        .map(|i| {
            if i < periods {
                return None;
            }
            let prev = series.values[i - periods]?;
            let cur = series.values[i]?;
            f(prev, cur).filter(|v| v.is_finite())
        })
        .collect();
    TimeSeries::new(series.name.clone(), series.dates.clone(), values)
}

/// Standardize with the whole-sample mean and sample standard deviation.
///
/// Uses every present value, including ones after a given date, so the result
/// is descriptive only. Missing positions stay missing.
pub fn zscore(series: &TimeSeries) -> Result<TimeSeries> {
    let present = series.present();
    let degenerate = || AnalysisError::DegenerateSeries {
        column: series.name.clone(),
    };
    if is_constant(&present) {
        return Err(degenerate());
    }
    let mu = mean(&present).ok_or_else(degenerate)?;
    let sd = sample_std(&present)
        .filter(|s| s.is_finite() && *s > 0.0)
        .ok_or_else(degenerate)?;

    let values = series.values.iter().map(|v| v.map(|x| (x - mu) / sd)).collect();
    Ok(TimeSeries::new(series.name.clone(), series.dates.clone(), values))
}

/// Percent change of each selected column, keeping only rows where every
/// selected column has a defined change.
pub fn return_table(table: &AlignedTable, columns: &[&str], periods: usize) -> Result<AlignedTable> {
    let changes = columns
        .iter()
        .map(|name| {
            table
                .series(name)
                .map(|s| percent_change(&s, periods))
                .ok_or_else(|| AnalysisError::missing(name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut dates = Vec::with_capacity(table.len());
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(table.len()); changes.len()];
    for (row, date) in table.dates().iter().enumerate() {
        if changes.iter().any(|c| c.values[row].is_none()) {
            continue;
        }
        dates.push(*date);
        for (change, out) in changes.iter().zip(values.iter_mut()) {
            if let Some(v) = change.values[row] {
                out.push(v);
            }
        }
    }

    let columns = columns
        .iter()
        .zip(values)
        .map(|(name, values)| Column {
            name: name.to_string(),
            values,
        })
        .collect();
    Ok(AlignedTable::from_parts(dates, columns))
}

/// Z-score of each selected column over the table's full period.
pub fn zscore_table(table: &AlignedTable, columns: &[&str]) -> Result<AlignedTable> {
    let mut out = Vec::with_capacity(columns.len());
    for name in columns {
        let series = table.series(name).ok_or_else(|| AnalysisError::missing(name))?;
        let z = zscore(&series)?;
        out.push(Column {
            name: name.to_string(),
            // Aligned input has no gaps, so neither does its z-score.
            values: z.values.into_iter().flatten().collect(),
        });
    }
    Ok(AlignedTable::from_parts(table.dates().to_vec(), out))
}
