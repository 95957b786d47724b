//! Error types for configuration and input loading.
//!
//! Constraint violations during the search are never errors; these variants
//! only describe malformed input that should stop a run before it starts.

use thiserror::Error;

/// Errors raised while building a schedule run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A time string could not be parsed as `HH:MM`.
    #[error("invalid time '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    /// An availability hour was outside `0..24` or not a number.
    #[error("invalid hour '{value}' for candidate '{candidate}' (row {row})")]
    InvalidHour {
        candidate: String,
        value: String,
        row: usize,
    },

    /// The scheduler configuration failed validation.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The same candidate appears twice in a processing order.
    #[error("candidate '{0}' appears more than once in the processing order")]
    DuplicateCandidate(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub(crate) fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
