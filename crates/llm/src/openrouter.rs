//! OpenRouter Provider
//!
//! Implementation of the LlmProvider trait for OpenRouter's OpenAI-compatible
//! chat-completions API. A single provider instance serves every model in a
//! fallback chain; `LlmRequestOptions::model_override` picks the model.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig, StopReason,
    UsageStats,
};
use crate::http_client::build_http_client;

/// Default OpenRouter API base
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default `X-Title` header value
pub const DEFAULT_APP_TITLE: &str = "FlexiTrip - Multi-Generational Travel Planning";

/// Default `HTTP-Referer` header value
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// OpenRouter provider
pub struct OpenRouterProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.request_timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Get the API base URL without a trailing slash
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(OPENROUTER_API_BASE)
            .trim_end_matches('/')
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url())
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url())
    }

    fn api_key(&self) -> LlmResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| missing_api_key_error("openrouter"))
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let model = request_options
            .model_override
            .as_deref()
            .unwrap_or(&self.config.model);

        let mut wire_messages: Vec<serde_json::Value> = Vec::new();
        if let Some(sys) = system {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }
        for msg in messages {
            wire_messages.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content
            }));
        }

        serde_json::json!({
            "model": model,
            "messages": wire_messages,
            "max_tokens": request_options.max_tokens_override.unwrap_or(self.config.max_tokens),
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
            "top_p": self.config.top_p,
            "frequency_penalty": self.config.frequency_penalty,
            "presence_penalty": self.config.presence_penalty,
        })
    }

    /// Parse a response from the API
    fn parse_response(&self, response: &ChatCompletionResponse, requested_model: &str) -> LlmResponse {
        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone());

        let stop_reason = choice
            .and_then(|c| c.finish_reason.as_ref())
            .map(|r| StopReason::from(r.as_str()))
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .as_ref()
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            stop_reason,
            usage,
            model: response
                .model
                .clone()
                .unwrap_or_else(|| requested_model.to_string()),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder, api_key: &str) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header(
                "HTTP-Referer",
                self.config.app_url.as_deref().unwrap_or(DEFAULT_APP_URL),
            )
            .header(
                "X-Title",
                self.config.app_title.as_deref().unwrap_or(DEFAULT_APP_TITLE),
            )
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self.api_key()?;
        let body = self.build_request_body(&messages, system.as_deref(), &request_options);
        let requested_model = body["model"].as_str().unwrap_or_default().to_string();

        tracing::debug!(
            model = %requested_model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .request(self.client.post(self.completions_url()), api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            tracing::warn!(model = %requested_model, status, "Chat completion request failed");
            return Err(parse_http_error(status, &body_text, "openrouter"));
        }

        let wire: ChatCompletionResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        if let Some(err) = wire.error.as_ref() {
            return Err(LlmError::ServerError {
                message: err.message.clone(),
                status: err.code,
            });
        }

        let parsed = self.parse_response(&wire, &requested_model);
        if parsed.text().trim().is_empty() {
            return Err(LlmError::ParseError {
                message: format!("{} returned an empty completion", parsed.model),
            });
        }

        tracing::info!(
            model = %parsed.model,
            tokens = parsed.usage.total_tokens(),
            truncated = parsed.is_truncated(),
            "Chat completion received"
        );
        Ok(parsed)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;

        let response = self
            .request(self.client.get(self.models_url()), api_key)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_http_error(status, &body, "openrouter"))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn list_models(&self) -> LlmResult<Option<Vec<String>>> {
        let api_key = self.api_key()?;

        let response = self
            .request(self.client.get(self.models_url()), api_key)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body, "openrouter"));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

        Ok(Some(model_ids(&body)))
    }
}

fn model_ids(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["id"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
    /// OpenRouter reports some upstream failures in a 200 body
    #[serde(default)]
    error: Option<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
    #[serde(default)]
    code: Option<u16>,
}
