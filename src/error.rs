use crate::analysis::AnalysisError;
use crate::narrative::NarrativeError;

/// Exit code for usage/configuration problems (missing keys, bad flags, export I/O).
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for failures raised by the analysis core.
pub const EXIT_ANALYSIS: u8 = 3;
/// Exit code for external service failures (FRED, narrative model).
pub const EXIT_SERVICE: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(EXIT_ANALYSIS, format!("Analysis failed: {err}"))
    }
}

impl From<NarrativeError> for AppError {
    fn from(err: NarrativeError) -> Self {
        AppError::new(EXIT_SERVICE, format!("Narrative generation failed: {err}"))
    }
}
