//! Model Fallback Chain
//!
//! Runs a completion against an ordered list of models, moving to the next
//! model when one fails. Failures are classified so a cancellation stops the
//! chain instead of burning through every model.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use flexitrip_llm::{LlmError, LlmResult};

/// Default model order: primary, then secondary, then tertiary.
pub const DEFAULT_MODELS: [&str; 3] = [
    "openrouter/horizon-beta",
    "anthropic/claude-3.5-sonnet",
    "openai/gpt-4o-mini",
];

/// Reasons a model attempt can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Model unknown, key rejected, or provider not reachable
    Unavailable,
    /// Attempt timed out
    Timeout,
    /// Provider returned an error
    Error,
    /// Rate limited
    RateLimited,
    /// Network/connection error
    NetworkError,
    /// Response could not be parsed
    InvalidResponse,
    /// Caller cancelled
    Cancelled,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Unavailable => write!(f, "unavailable"),
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::Error => write!(f, "error"),
            FailureReason::RateLimited => write!(f, "rate_limited"),
            FailureReason::NetworkError => write!(f, "network_error"),
            FailureReason::InvalidResponse => write!(f, "invalid_response"),
            FailureReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FailureReason {
    /// Check if this failure reason should trigger a fallback
    pub fn should_fallback(&self) -> bool {
        !matches!(self, FailureReason::Cancelled)
    }

    /// Classify a free-form error message into a failure reason
    pub fn from_error_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("cancel") || msg_lower.contains("abort") {
            FailureReason::Cancelled
        } else if msg_lower.contains("unavailable")
            || msg_lower.contains("not found")
            || msg_lower.contains("not configured")
        {
            FailureReason::Unavailable
        } else if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            FailureReason::Timeout
        } else if msg_lower.contains("rate limit")
            || msg_lower.contains("too many requests")
            || msg_lower.contains("429")
        {
            FailureReason::RateLimited
        } else if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("socket")
        {
            FailureReason::NetworkError
        } else if msg_lower.contains("invalid")
            || msg_lower.contains("parse")
            || msg_lower.contains("deserialize")
        {
            FailureReason::InvalidResponse
        } else {
            FailureReason::Error
        }
    }

    /// Classify a provider error
    pub fn from_llm_error(err: &LlmError) -> Self {
        match err {
            LlmError::AuthenticationFailed { .. }
            | LlmError::ModelNotFound { .. }
            | LlmError::ProviderUnavailable { .. } => FailureReason::Unavailable,
            LlmError::RateLimited { .. } => FailureReason::RateLimited,
            LlmError::NetworkError { message } => {
                if message.to_lowercase().contains("timed out") {
                    FailureReason::Timeout
                } else {
                    FailureReason::NetworkError
                }
            }
            LlmError::ParseError { .. } => FailureReason::InvalidResponse,
            LlmError::InvalidRequest { .. } | LlmError::ServerError { .. } => FailureReason::Error,
            LlmError::Other { message } => Self::from_error_message(message),
        }
    }
}

/// Errors from fallback execution
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("All models in fallback chain failed")]
    AllModelsFailed,

    #[error("No models configured")]
    NoModels,

    #[error("Model execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Execution cancelled")]
    Cancelled,
}

/// Result type for fallback operations
pub type FallbackResult<T> = Result<T, FallbackError>;

/// Configuration for fallback behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Maximum number of model attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_between_attempts_ms: u64,
    /// Timeout per attempt in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout_per_attempt_seconds: u64,
}

fn default_max_attempts() -> usize {
    DEFAULT_MODELS.len()
}

fn default_delay_ms() -> u64 {
    0
}

fn default_timeout() -> u64 {
    120
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_between_attempts_ms: default_delay_ms(),
            timeout_per_attempt_seconds: default_timeout(),
        }
    }
}

/// Record of a single model attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackAttempt {
    /// Model that was tried
    pub model: String,
    /// Whether this attempt succeeded
    pub success: bool,
    /// Failure reason if failed
    pub failure_reason: Option<FailureReason>,
    /// Error message if failed
    pub error_message: Option<String>,
    /// Duration of the attempt in milliseconds
    pub duration_ms: u64,
    /// Timestamp when attempt started
    pub started_at: String,
}

impl FallbackAttempt {
    /// Create a successful attempt record
    pub fn success(model: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            model: model.into(),
            success: true,
            failure_reason: None,
            error_message: None,
            duration_ms,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a failed attempt record
    pub fn failure(
        model: impl Into<String>,
        reason: FailureReason,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            model: model.into(),
            success: false,
            failure_reason: Some(reason),
            error_message: Some(error.into()),
            duration_ms,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Log of all attempts made for one completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackExecutionLog {
    pub attempts: Vec<FallbackAttempt>,
    pub total_duration_ms: u64,
    /// Model that finally answered (if any)
    pub successful_model: Option<String>,
    pub overall_success: bool,
}

impl FallbackExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attempt(&mut self, attempt: FallbackAttempt) {
        self.total_duration_ms += attempt.duration_ms;
        if attempt.success {
            self.successful_model = Some(attempt.model.clone());
            self.overall_success = true;
        }
        self.attempts.push(attempt);
    }

    /// Number of failed attempts before success
    pub fn failed_attempts_count(&self) -> usize {
        self.attempts.iter().filter(|a| !a.success).count()
    }
}

/// Ordered list of models tried one after another.
#[derive(Debug, Clone)]
pub struct ModelFallbackChain {
    models: Vec<String>,
    config: FallbackConfig,
}

impl Default for ModelFallbackChain {
    fn default() -> Self {
        Self::new(DEFAULT_MODELS.iter().map(|m| m.to_string()).collect())
    }
}

impl ModelFallbackChain {
    /// Create a chain over `models`, in preference order.
    pub fn new(models: Vec<String>) -> Self {
        let config = FallbackConfig {
            max_attempts: models.len().max(1),
            ..Default::default()
        };
        Self { models, config }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: FallbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a model to the end of the chain
    pub fn add_model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self.config.max_attempts = self.config.max_attempts.max(self.models.len());
        self
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// First model in the chain
    pub fn primary_model(&self) -> Option<&str> {
        self.models.first().map(String::as_str)
    }

    /// All models in order
    pub fn models(&self) -> Vec<&str> {
        self.models.iter().map(String::as_str).collect()
    }

    /// Model to try after `current` fails
    pub fn next_model_after(&self, current: &str) -> Option<&str> {
        let current_idx = self.models.iter().position(|m| m == current)?;
        self.models.get(current_idx + 1).map(String::as_str)
    }

    /// Run `executor` against each model until one succeeds.
    ///
    /// The executor receives the model name. Every attempt is bounded by the
    /// configured per-attempt timeout.
    pub async fn execute_with_fallback<F, Fut, T>(
        &self,
        mut executor: F,
    ) -> FallbackResult<(T, FallbackExecutionLog)>
    where
        F: FnMut(String) -> Fut,
        Fut: std::future::Future<Output = LlmResult<T>>,
    {
        if self.models.is_empty() {
            return Err(FallbackError::NoModels);
        }

        let mut log = FallbackExecutionLog::new();
        let mut attempts = 0;

        for model in &self.models {
            if attempts >= self.config.max_attempts {
                warn!("Max fallback attempts ({}) reached", self.config.max_attempts);
                break;
            }

            info!("Attempting completion with model: {}", model);
            let attempt_start = Instant::now();

            let outcome = if self.config.timeout_per_attempt_seconds > 0 {
                let limit = Duration::from_secs(self.config.timeout_per_attempt_seconds);
                match tokio::time::timeout(limit, executor(model.clone())).await {
                    Ok(outcome) => {
                        outcome.map_err(|e| (FailureReason::from_llm_error(&e), e.to_string()))
                    }
                    Err(_) => Err((
                        FailureReason::Timeout,
                        format!("Attempt timed out after {}s", limit.as_secs()),
                    )),
                }
            } else {
                executor(model.clone())
                    .await
                    .map_err(|e| (FailureReason::from_llm_error(&e), e.to_string()))
            };

            let duration_ms = attempt_start.elapsed().as_millis() as u64;
            match outcome {
                Ok(result) => {
                    info!("Model {} succeeded in {}ms", model, duration_ms);
                    log.add_attempt(FallbackAttempt::success(model, duration_ms));
                    return Ok((result, log));
                }
                Err((reason, error_msg)) => {
                    warn!("Model {} failed: {} (reason: {})", model, error_msg, reason);
                    log.add_attempt(FallbackAttempt::failure(
                        model,
                        reason,
                        &error_msg,
                        duration_ms,
                    ));

                    if reason == FailureReason::Cancelled {
                        error!("Completion cancelled, not falling back");
                        return Err(FallbackError::Cancelled);
                    }
                    if !reason.should_fallback() {
                        return Err(FallbackError::ExecutionFailed(error_msg));
                    }

                    attempts += 1;

                    if self.config.delay_between_attempts_ms > 0
                        && attempts < self.config.max_attempts
                    {
                        debug!(
                            "Waiting {}ms before next attempt",
                            self.config.delay_between_attempts_ms
                        );
                        tokio::time::sleep(Duration::from_millis(
                            self.config.delay_between_attempts_ms,
                        ))
                        .await;
                    }
                }
            }
        }

        error!(
            "All models in fallback chain failed after {} attempts",
            log.attempts.len()
        );
        Err(FallbackError::AllModelsFailed)
    }
}
