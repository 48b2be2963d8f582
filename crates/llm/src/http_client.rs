//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with a request
//! timeout.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` whose requests give up after `timeout_secs`.
///
/// A zero timeout disables the limit.
pub fn build_http_client(timeout_secs: u64) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder.build().map_err(|e| LlmError::ProviderUnavailable {
        message: format!("failed to build HTTP client: {}", e),
    })
}
