//! Error types for the survey library.
//!
//! Library functions return [`SurveyError`]; the binary wraps them in
//! `anyhow` for reporting.

use thiserror::Error;

/// Everything that can go wrong during one analysis pass.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("File {0} not found.")]
    NotFound(String),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: field '{field}' is not numeric: {value:?}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: required field '{field}' is missing")]
    MissingField { row: usize, field: &'static str },

    #[error("no traffic data available in {0}")]
    EmptySource(String),

    #[error("{0}")]
    InvalidDate(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SurveyError {
    /// True when the error describes bad input data rather than a broken
    /// environment or a bug.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            SurveyError::Parse { .. }
                | SurveyError::MissingField { .. }
                | SurveyError::EmptySource(_)
                | SurveyError::Csv(_)
        )
    }
}
