//! Response Normalizer
//!
//! Turns the raw text of an upstream completion into a `NormalizedResponse`.
//! The model is told to answer with one JSON object but frequently wraps it in
//! prose, breaks an escape, or runs out of tokens halfway through. Recovery is
//! a cascade of decode attempts, each returning `Some` on success:
//!
//! 1. direct parse of the whole input
//! 2. repair from the first `{` (cut at balance, or close what was left open)
//! 3. field extraction of `"conversational_response": "..."`
//! 4. the raw input verbatim
//!
//! Every input yields a response; nothing here returns an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::json_repair::repair_json_candidate;

/// Shown when nothing usable can be recovered.
pub const GENERIC_RESPONSE: &str =
    "I can help you plan your trip! Could you tell me more about what you're looking for?";

const TEXT_FIELD: &str = "conversational_response";
const RECOMMENDATIONS_FIELD: &str = "structured_recommendations";

/// The upstream reply after contract recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Never empty
    pub conversational_response: String,
    /// Raw recommendation objects as the model sent them
    #[serde(default)]
    pub structured_recommendations: Vec<Value>,
}

impl NormalizedResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            conversational_response: text.into(),
            structured_recommendations: Vec::new(),
        }
    }

    pub fn has_structured(&self) -> bool {
        !self.structured_recommendations.is_empty()
    }
}

/// Which decode attempt produced a `NormalizedResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTier {
    DirectParse,
    TruncationRepair,
    FieldExtraction,
    Verbatim,
}

impl std::fmt::Display for RecoveryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecoveryTier::DirectParse => "direct_parse",
            RecoveryTier::TruncationRepair => "truncation_repair",
            RecoveryTier::FieldExtraction => "field_extraction",
            RecoveryTier::Verbatim => "verbatim",
        };
        write!(f, "{}", name)
    }
}

/// Result of a single tier.
enum Decode {
    Accepted(NormalizedResponse),
    /// Parsed, but as something that can only be shown verbatim
    Verbatim,
    Miss,
}

/// Normalize a raw completion into `{conversational_response, structured_recommendations}`.
pub fn normalize_response(raw: &str) -> NormalizedResponse {
    normalize_with_tier(raw).0
}

/// Like `normalize_response`, also reporting the tier that produced the result.
pub fn normalize_with_tier(raw: &str) -> (NormalizedResponse, RecoveryTier) {
    if raw.trim().is_empty() {
        tracing::debug!("Empty completion, using generic response");
        return (NormalizedResponse::text(GENERIC_RESPONSE), RecoveryTier::Verbatim);
    }

    match decode_direct(raw) {
        Decode::Accepted(response) => {
            tracing::debug!("Completion parsed directly");
            return (response, RecoveryTier::DirectParse);
        }
        Decode::Verbatim => return verbatim(raw),
        Decode::Miss => {}
    }

    if let Some(response) = decode_repaired(raw) {
        tracing::warn!(len = raw.len(), "Completion recovered by JSON repair");
        return (response, RecoveryTier::TruncationRepair);
    }

    if let Some(response) = decode_text_field(raw) {
        tracing::warn!(len = raw.len(), "Completion recovered by field extraction");
        return (response, RecoveryTier::FieldExtraction);
    }

    verbatim(raw)
}

fn verbatim(raw: &str) -> (NormalizedResponse, RecoveryTier) {
    tracing::warn!(len = raw.len(), "No JSON contract found, using completion verbatim");
    (NormalizedResponse::text(raw.trim()), RecoveryTier::Verbatim)
}

fn decode_direct(raw: &str) -> Decode {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Object(map)) => from_object(map).map_or(Decode::Miss, Decode::Accepted),
        Ok(Value::String(s)) if !s.trim().is_empty() => {
            Decode::Accepted(NormalizedResponse::text(s))
        }
        Ok(_) => Decode::Verbatim,
        Err(_) => Decode::Miss,
    }
}

fn decode_repaired(raw: &str) -> Option<NormalizedResponse> {
    let candidate = repair_json_candidate(raw)?;
    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(map)) => from_object(map),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Repaired candidate still not valid JSON");
            None
        }
    }
}

/// Accept an object carrying at least one contract field.
fn from_object(mut map: Map<String, Value>) -> Option<NormalizedResponse> {
    if !map.contains_key(TEXT_FIELD) && !map.contains_key(RECOMMENDATIONS_FIELD) {
        return None;
    }

    let conversational_response = map
        .remove(TEXT_FIELD)
        .and_then(coerce_text)
        .unwrap_or_else(|| GENERIC_RESPONSE.to_string());

    let structured_recommendations = match map.remove(RECOMMENDATIONS_FIELD) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::debug!(kind = value_kind(&other), "Non-array recommendations coerced to []");
            Vec::new()
        }
        None => Vec::new(),
    };

    Some(NormalizedResponse {
        conversational_response,
        structured_recommendations,
    })
}

/// String coercion for a non-string text field. `None` when there is nothing
/// to show.
fn coerce_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)"conversational_response"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("valid text field pattern")
    })
}

fn open_text_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""conversational_response"\s*:\s*""#).expect("valid open field pattern")
    })
}

fn decode_text_field(raw: &str) -> Option<NormalizedResponse> {
    let escaped = match text_field_pattern().captures(raw) {
        Some(caps) => caps.get(1).map(|m| m.as_str())?,
        // A value cut off by the token limit runs to the end of the input.
        None => {
            let m = open_text_field_pattern().find(raw)?;
            raw[m.end()..].trim_end().trim_end_matches('\\')
        }
    };

    let text = unescape_json_string(escaped);
    if text.trim().is_empty() {
        return None;
    }
    Some(NormalizedResponse::text(text))
}

/// Decode JSON string escapes, falling back to the common ones when the
/// content holds an escape serde rejects.
fn unescape_json_string(escaped: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", escaped)).unwrap_or_else(|_| {
        escaped
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\t", "\t")
            .replace("\\\\", "\\")
    })
}
