//! # AppError
//!
//! Centralized error handling for the Deer Park board engine.
//! Every public operation reports one of these instead of panicking.

use thiserror::Error;

/// The primary error type for all dpd-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Required field missing/blank, or a category outside the fixed set.
    /// Nothing was mutated; the caller shows a dismissable notice.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found (e.g., a reply aimed at a topic that is gone)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Durable storage read or write failed
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Stored data exists but cannot be parsed
    #[error("malformed storage data: {0}")]
    MalformedData(String),

    /// The (simulated) remote call failed
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for outcomes the user can fix by editing their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn topic_not_found(id: i64) -> Self {
        AppError::NotFound("topic".to_string(), id.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedData(err.to_string())
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, AppError>;
