use std::result::Result as StdResult;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::DateWindowError;

/// Errors that reject a whole analysis request.
///
/// Record-level problems never surface here; they are recovered locally and
/// reported as [`crate::domain::Warning`] entries instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid window: end {end} must be after start {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, EngineError>;

impl From<DateWindowError> for EngineError {
    fn from(err: DateWindowError) -> Self {
        match err {
            DateWindowError::InvalidRange { start, end } => {
                EngineError::InvalidWindow { start, end }
            }
        }
    }
}
