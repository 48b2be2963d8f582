//! FlexiTrip LLM
//!
//! Provides a unified interface for chat-completion providers and the
//! OpenRouter implementation (OpenAI-compatible wire format) used by the
//! travel advisor.
//!
//! Also includes the HTTP client factory.

pub mod http_client;
pub mod openrouter;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openrouter::OpenRouterProvider;
pub use provider::{missing_api_key_error, parse_http_error, LlmProvider};
pub use types::*;
