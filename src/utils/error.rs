//! Error Handling
//!
//! Unified error types for the advisor service layer.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use flexitrip_llm::LlmError;

use crate::services::fallback::FallbackError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (missing API key, bad settings file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML settings parse errors
    #[error("Settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Provider errors that escaped the fallback chain
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Every model in the chain failed, or the chain refused to continue
    #[error("Fallback error: {0}")]
    Fallback(#[from] FallbackError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream service could not produce a reply
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for API error bodies
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
