//! Advisor Stream Event Types
//!
//! Events pushed to a consumer while an assistant reply is delivered
//! incrementally. Text arrives first as word chunks, then the extracted
//! recommendation cards, then a single completion marker.

use serde::{Deserialize, Serialize};

use crate::recommendation::RecommendationRecord;

/// Streaming event emitted by the advisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvisorStreamEvent {
    /// Text content delta of the conversational reply
    TextDelta { content: String },

    /// Recommendation cards extracted from the finished reply
    Recommendations {
        recommendations: Vec<RecommendationRecord>,
    },

    /// Token usage reported by the upstream model
    Usage {
        input_tokens: u32,
        output_tokens: u32,
    },

    /// Error during streaming
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// Stream complete
    Complete {
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
}

impl AdvisorStreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AdvisorStreamEvent::Complete { .. } | AdvisorStreamEvent::Error { .. })
    }
}

/// Split text into word chunks that concatenate back to the original.
///
/// Each chunk is a word followed by its trailing whitespace, so the consumer
/// can append deltas without re-inserting separators.
pub fn word_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            chunks.push(std::mem::take(&mut current));
            in_space = false;
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Category;

    #[test]
    fn test_text_delta_serialization() {
        let event = AdvisorStreamEvent::TextDelta {
            content: "Hello ".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"text_delta\""));
        assert!(json.contains("\"content\":\"Hello \""));

        let parsed: AdvisorStreamEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_recommendations_event_serialization() {
        let record = RecommendationRecord::new("t1_rec_0", "Louvre", Category::Attraction, "Art");
        let event = AdvisorStreamEvent::Recommendations {
            recommendations: vec![record],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "recommendations");
        assert_eq!(json["recommendations"][0]["title"], "Louvre");
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_complete_is_terminal() {
        let event = AdvisorStreamEvent::Complete { model: None };
        assert!(event.is_terminal());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, "{\"type\":\"complete\"}");
    }

    #[test]
    fn test_word_chunks_concatenate_back() {
        let text = "Visit  the Louvre\nin the morning.";
        let chunks = word_chunks(text);
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks[0], "Visit  ");
        assert_eq!(chunks.last().map(String::as_str), Some("morning."));
    }

    #[test]
    fn test_word_chunks_empty() {
        assert!(word_chunks("").is_empty());
    }
}
