//! Chat Models
//!
//! Conversation messages exchanged with the advisor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flexitrip_llm::Message;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// Provenance of an assistant message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    /// Milliseconds from request to normalized reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
}

/// A single message in a trip conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_recommendations: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    /// Create a message stamped with the current time
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            structured_recommendations: None,
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Convert to the provider wire message
    pub fn to_llm_message(&self) -> Message {
        match self.role {
            ChatRole::User => Message::user(&self.content),
            ChatRole::Assistant => Message::assistant(&self.content),
            ChatRole::System => Message::system(&self.content),
        }
    }
}
