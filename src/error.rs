//! Error types for answer validation and question import

use thiserror::Error;

/// Errors raised by the crate.
///
/// A guess that does not match is never an error; `validate` reports it as an
/// incorrect [`MatchDecision`](crate::MatchDecision).
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("tolerance must be within [0.0, 1.0], got {0}")]
    InvalidTolerance(f64),

    #[error("invalid match configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required '{0}' column in file header")]
    MissingColumn(&'static str),

    #[error("empty file - no header row")]
    EmptySheet,

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read Excel file: {0}")]
    Excel(#[from] calamine::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("duplicate question id {0}")]
    DuplicateQuestion(u64),

    #[error("question {0} not found")]
    UnknownQuestion(u64),

    #[error("game round already completed")]
    RoundCompleted,
}

pub type Result<T> = std::result::Result<T, MatchError>;

// ============= Python Binding =============

#[cfg(feature = "python")]
impl From<MatchError> for pyo3::PyErr {
    fn from(err: MatchError) -> Self {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};

        match err {
            MatchError::InvalidTolerance(_)
            | MatchError::InvalidConfig(_)
            | MatchError::DuplicateQuestion(_) => PyValueError::new_err(err.to_string()),
            MatchError::UnknownQuestion(_) => PyKeyError::new_err(err.to_string()),
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}
