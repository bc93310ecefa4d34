use thiserror::Error;

/// Failures raised by the analysis core.
///
/// Every variant is raised synchronously by the stage that detects it and is
/// never retried or replaced with a default value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no rows survive alignment; every date has at least one series without a prior observation")]
    InsufficientData,
    #[error("required column '{column}' is missing")]
    MissingComponent { column: String },
    #[error("series '{column}' has zero variance and cannot be standardized")]
    DegenerateSeries { column: String },
    #[error("rolling window {size} is outside the allowed range [{min}, {max}]")]
    InvalidWindow { size: usize, min: usize, max: usize },
    #[error("series '{left}' and '{right}' do not share a date index")]
    IndexMismatch { left: String, right: String },
    #[error("series '{name}' was supplied more than once")]
    DuplicateSeries { name: String },
}

impl AnalysisError {
    pub(crate) fn missing(column: &str) -> Self {
        AnalysisError::MissingComponent {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
