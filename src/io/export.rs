//! Export a run report to JSON.
//!
//! The export is meant to be easy to consume in notebooks or downstream
//! scripts: readings, score, latest rolling values and the correlation matrix,
//! with missing values as `null`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::{AnalysisOutput, CompositeScore, SignalReadings};
use crate::domain::AnalysisConfig;
use crate::error::{AppError, EXIT_CONFIG};
use crate::report::MarketSummary;

#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub tool: String,
    pub as_of: NaiveDate,
    pub lookback_days: u32,
    pub window: usize,
    pub summary: MarketSummary,
    pub readings: SignalReadings,
    pub score: CompositeScore,
    pub rolling_latest: Vec<RollingLatest>,
    pub divergence_dates: Vec<NaiveDate>,
    pub matrix: MatrixFile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollingLatest {
    pub left: String,
    pub right: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixFile {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl ReportFile {
    pub fn new(summary: &MarketSummary, output: &AnalysisOutput, config: &AnalysisConfig) -> Self {
        Self {
            tool: "liq".to_string(),
            as_of: config.lookback.as_of,
            lookback_days: config.lookback.days,
            window: config.window,
            summary: summary.clone(),
            readings: output.readings,
            score: output.score,
            rolling_latest: output
                .rolling
                .entries
                .iter()
                .map(|e| RollingLatest {
                    left: e.pair.left.clone(),
                    right: e.pair.right.clone(),
                    value: e.series.latest(),
                })
                .collect(),
            divergence_dates: output.divergence.recent_dates(config.divergence_lookback),
            matrix: MatrixFile {
                columns: output.matrix.columns().to_vec(),
                values: output.matrix.rows(),
            },
        }
    }
}

/// Write the report JSON file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(EXIT_CONFIG, format!("Failed to create report JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
