//! Core Error Types
//!
//! Foundational error types shared across the FlexiTrip workspace. Kept to
//! thiserror + serde_json so the core crate stays lightweight.
//!
//! The application crate extends these with configuration, provider and
//! fallback variants that need heavier dependencies.

use thiserror::Error;

/// Core error type for the FlexiTrip workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A label or value could not be parsed into a domain type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
