//! Settings Integration Tests
//!
//! Loading `AdvisorSettings` from TOML files and building an advisor from them.

use std::io::Write;

use flexitrip::models::settings::{AdvisorSettings, ENV_API_KEY, ENV_MODELS};
use flexitrip::{AppError, TravelAdvisor};
use tempfile::NamedTempFile;

fn write_settings(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_settings_file() {
    let file = write_settings(
        r#"
api_key = "sk-or-file"
app_title = "FlexiTrip Staging"
models = ["anthropic/claude-3.5-sonnet", "openai/gpt-4o-mini"]
max_tokens = 3000
stream_chunk_delay_ms = 0
"#,
    );

    let settings = AdvisorSettings::load(file.path()).unwrap();
    assert_eq!(settings.api_key.as_deref(), Some("sk-or-file"));
    assert_eq!(settings.app_title, "FlexiTrip Staging");
    assert_eq!(settings.max_tokens, 3000);
    assert_eq!(settings.stream_chunk_delay_ms, 0);
    // Untouched keys keep their defaults
    assert_eq!(settings.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(settings.request_timeout_secs, 120);

    let config = settings.provider_config().unwrap();
    assert_eq!(config.model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.max_tokens, 3000);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = AdvisorSettings::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn test_load_rejects_out_of_range_values() {
    let file = write_settings("temperature = 3.5\n");
    let result = AdvisorSettings::load(file.path());
    assert!(matches!(result, Err(AppError::Config(_))));

    let file = write_settings("top_p = -0.1\n");
    assert!(AdvisorSettings::load(file.path()).is_err());
}

#[test]
fn test_env_style_lookup() {
    let settings = AdvisorSettings::from_lookup(|key| match key {
        k if k == ENV_API_KEY => Some("sk-or-env".to_string()),
        k if k == ENV_MODELS => Some("openai/gpt-4o-mini".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(settings.models, vec!["openai/gpt-4o-mini"]);
    assert_eq!(settings.fallback_chain().primary_model(), Some("openai/gpt-4o-mini"));
}

#[test]
fn test_advisor_requires_api_key() {
    let settings = AdvisorSettings::default();
    let result = TravelAdvisor::from_settings(&settings);
    assert!(matches!(result, Err(AppError::Config(_))));

    let settings = AdvisorSettings {
        api_key: Some("sk-or-test".to_string()),
        ..Default::default()
    };
    let advisor = TravelAdvisor::from_settings(&settings).unwrap();
    assert_eq!(advisor.chain().models().len(), 3);
}
