//! Model Fallback Chain Service
//!
//! Tries each configured model in turn when a completion fails.

mod chain;

pub use chain::{
    FailureReason, FallbackAttempt, FallbackConfig, FallbackError, FallbackExecutionLog,
    FallbackResult, ModelFallbackChain, DEFAULT_MODELS,
};
