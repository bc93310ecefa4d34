//! Series alignment.
//!
//! Raw series arrive at their native frequencies (weekly balance sheet data,
//! business-daily market closes, seven-day crypto prices). Alignment is done in
//! explicit phases so nothing is ever matched up by position:
//!
//! 1. union of every series' dates inside the lookback window
//! 2. per-column forward fill over that union index
//! 3. drop rows that still hold a gap (only possible before a series' first
//!    observation in the window)

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::analysis::error::{AnalysisError, Result};
use crate::domain::{AlignedTable, Column, LookbackWindow, RawSeries};

/// Merge raw series into one fully populated table.
pub fn align(series: &[RawSeries], window: &LookbackWindow) -> Result<AlignedTable> {
    let mut seen = HashSet::new();
    for s in series {
        if !seen.insert(s.name.as_str()) {
            return Err(AnalysisError::DuplicateSeries {
                name: s.name.clone(),
            });
        }
    }

    // Phase 1: per-series lookups and the union index.
    let mut index: BTreeSet<NaiveDate> = BTreeSet::new();
    let lookups: Vec<BTreeMap<NaiveDate, Option<f64>>> = series
        .iter()
        .map(|s| {
            let mut map = BTreeMap::new();
            for &(date, value) in &s.observations {
                if !window.contains(date) {
                    continue;
                }
                index.insert(date);
                // Later observations for the same date win.
                map.insert(date, value.filter(|v| v.is_finite()));
            }
            map
        })
        .collect();

    // Phase 2: forward fill each column independently.
    let filled: Vec<Vec<Option<f64>>> = lookups
        .iter()
        .map(|lookup| {
            let mut last = None;
            index
                .iter()
                .map(|date| {
                    if let Some(Some(v)) = lookup.get(date) {
                        last = Some(*v);
                    }
                    last
                })
                .collect()
        })
        .collect();

    // Phase 3: keep only fully populated rows.
    let mut dates = Vec::with_capacity(index.len());
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(index.len()); series.len()];
    for (row, date) in index.iter().enumerate() {
        if filled.iter().any(|col| col[row].is_none()) {
            continue;
        }
        dates.push(*date);
        for (col, out) in filled.iter().zip(values.iter_mut()) {
            if let Some(v) = col[row] {
                out.push(v);
            }
        }
    }

    if dates.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }

    let columns = series
        .iter()
        .zip(values)
        .map(|(s, values)| Column {
            name: s.name.clone(),
            values,
        })
        .collect();

    Ok(AlignedTable::from_parts(dates, columns))
}
