//! Settings Models
//!
//! Advisor configuration: provider credentials, sampling parameters, model
//! fallback order and streaming pacing. Loaded from TOML or the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use flexitrip_llm::openrouter::{DEFAULT_APP_TITLE, DEFAULT_APP_URL, OPENROUTER_API_BASE};
use flexitrip_llm::ProviderConfig;

use crate::services::fallback::{FallbackConfig, ModelFallbackChain, DEFAULT_MODELS};
use crate::utils::error::{AppError, AppResult};

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_APP_URL: &str = "FLEXITRIP_APP_URL";
pub const ENV_MODELS: &str = "FLEXITRIP_MODELS";

/// Advisor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    /// OpenRouter API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `HTTP-Referer`
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Sent as `X-Title`
    #[serde(default = "default_app_title")]
    pub app_title: String,
    /// Models in fallback order
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "default_penalty")]
    pub presence_penalty: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Pause between fallback attempts
    #[serde(default)]
    pub retry_delay_ms: u64,
    /// Pause between simulated stream chunks
    #[serde(default = "default_stream_chunk_delay_ms")]
    pub stream_chunk_delay_ms: u64,
}

fn default_base_url() -> String {
    OPENROUTER_API_BASE.to_string()
}

fn default_app_url() -> String {
    DEFAULT_APP_URL.to_string()
}

fn default_app_title() -> String {
    DEFAULT_APP_TITLE.to_string()
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_max_tokens() -> u32 {
    5000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_penalty() -> f32 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_stream_chunk_delay_ms() -> u64 {
    50
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            app_url: default_app_url(),
            app_title: default_app_title(),
            models: default_models(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_delay_ms: 0,
            stream_chunk_delay_ms: default_stream_chunk_delay_ms(),
        }
    }
}

impl AdvisorSettings {
    /// Parse settings from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded advisor settings");
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which plays the role of the
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(key) = non_empty(ENV_API_KEY) {
            settings.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            settings.base_url = url.trim().to_string();
        }
        if let Some(url) = non_empty(ENV_APP_URL) {
            settings.app_url = url.trim().to_string();
        }
        if let Some(models) = non_empty(ENV_MODELS) {
            settings.models = models
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> AppResult<()> {
        if self.models.is_empty() {
            return Err(AppError::config("at least one model must be configured"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::config(format!(
                "temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(AppError::config(format!("top_p {} outside [0, 1]", self.top_p)));
        }
        if self.max_tokens == 0 {
            return Err(AppError::config("max_tokens must be positive"));
        }
        Ok(())
    }

    /// Provider configuration for the primary model.
    ///
    /// Fails when no API key is configured.
    pub fn provider_config(&self) -> AppResult<ProviderConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("{} is not set", ENV_API_KEY)))?;

        Ok(ProviderConfig {
            api_key: Some(api_key.to_string()),
            base_url: Some(self.base_url.clone()),
            model: self.models.first().cloned().unwrap_or_default(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            request_timeout_secs: self.request_timeout_secs,
            app_url: Some(self.app_url.clone()),
            app_title: Some(self.app_title.clone()),
        })
    }

    /// Fallback chain over the configured models.
    pub fn fallback_chain(&self) -> ModelFallbackChain {
        ModelFallbackChain::new(self.models.clone()).with_config(FallbackConfig {
            max_attempts: self.models.len(),
            delay_between_attempts_ms: self.retry_delay_ms,
            timeout_per_attempt_seconds: self.request_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = AdvisorSettings::default();
        assert_eq!(settings.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(settings.app_url, "http://localhost:3000");
        assert_eq!(settings.models.len(), 3);
        assert_eq!(settings.max_tokens, 5000);
        assert_eq!(settings.stream_chunk_delay_ms, 50);
        assert_eq!(settings.retry_delay_ms, 0);
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = AdvisorSettings::from_toml_str(
            r#"
api_key = "sk-or-test"
models = ["openai/gpt-4o-mini"]
temperature = 0.2
"#,
        )
        .unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(settings.models, vec!["openai/gpt-4o-mini"]);
        assert_eq!(settings.temperature, 0.2);
        assert_eq!(settings.top_p, 0.9);
    }

    #[test]
    fn test_from_toml_rejects_empty_models() {
        let result = AdvisorSettings::from_toml_str("models = []");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_toml_syntax_error() {
        let result = AdvisorSettings::from_toml_str("max_tokens = ");
        assert!(matches!(result, Err(AppError::Toml(_))));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, " sk-or-env "),
            (ENV_MODELS, "a/one, b/two,,"),
            (ENV_APP_URL, ""),
        ]
        .into_iter()
        .collect();
        let settings =
            AdvisorSettings::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-or-env"));
        assert_eq!(settings.models, vec!["a/one", "b/two"]);
        assert_eq!(settings.app_url, "http://localhost:3000");
    }

    #[test]
    fn test_provider_config_requires_api_key() {
        let settings = AdvisorSettings::default();
        assert!(matches!(settings.provider_config(), Err(AppError::Config(_))));

        let settings = AdvisorSettings {
            api_key: Some("sk-or-test".to_string()),
            ..Default::default()
        };
        let config = settings.provider_config().unwrap();
        assert_eq!(config.model, "openrouter/horizon-beta");
        assert_eq!(config.app_title.as_deref(), Some(DEFAULT_APP_TITLE));
    }

    #[test]
    fn test_fallback_chain_uses_model_order() {
        let settings = AdvisorSettings {
            models: vec!["x/a".to_string(), "y/b".to_string()],
            retry_delay_ms: 10,
            ..Default::default()
        };
        let chain = settings.fallback_chain();
        assert_eq!(chain.models(), vec!["x/a", "y/b"]);
        assert_eq!(chain.config().max_attempts, 2);
        assert_eq!(chain.config().delay_between_attempts_ms, 10);
    }
}
