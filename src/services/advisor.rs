//! Travel Advisor Service
//!
//! Runs one assistant turn: system prompt, completion through the model
//! fallback chain, contract recovery of the raw reply, and recommendation
//! extraction. `stream_reply` delivers the same turn as word-chunk events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use flexitrip_core::{word_chunks, AdvisorStreamEvent, RecommendationRecord};
use flexitrip_llm::{LlmProvider, LlmRequestOptions, LlmResponse, Message, OpenRouterProvider};
use flexitrip_response::{extract_recommendations, normalize_with_tier, RecoveryTier};

use crate::models::chat::{ChatMessage, MessageMetadata};
use crate::models::settings::AdvisorSettings;
use crate::models::traveler::Traveler;
use crate::services::fallback::{
    FallbackError, FallbackExecutionLog, FallbackResult, ModelFallbackChain,
};
use crate::services::prompt::build_system_prompt;
use crate::utils::error::{AppError, AppResult};

/// Message shown to the user when every model failed.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "AI service temporarily unavailable";

/// One finished assistant turn.
#[derive(Debug, Clone)]
pub struct AdvisorReply {
    /// The assistant message, ready to append to the conversation
    pub message: ChatMessage,
    /// Cards for this turn, ids prefixed with the turn id
    pub recommendations: Vec<RecommendationRecord>,
    /// Which normalizer tier recovered the reply
    pub recovery_tier: RecoveryTier,
    /// Model attempts made for this turn
    pub attempts: FallbackExecutionLog,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Travel advisor over a chat-completion provider.
pub struct TravelAdvisor {
    provider: Arc<dyn LlmProvider>,
    chain: ModelFallbackChain,
    stream_chunk_delay: Duration,
}

impl TravelAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>, chain: ModelFallbackChain) -> Self {
        Self {
            provider,
            chain,
            stream_chunk_delay: Duration::ZERO,
        }
    }

    /// Build an OpenRouter-backed advisor from settings.
    pub fn from_settings(settings: &AdvisorSettings) -> AppResult<Self> {
        let provider = OpenRouterProvider::new(settings.provider_config()?)?;
        Ok(Self::new(Arc::new(provider), settings.fallback_chain())
            .with_stream_chunk_delay(Duration::from_millis(settings.stream_chunk_delay_ms)))
    }

    /// Pause between streamed word chunks.
    pub fn with_stream_chunk_delay(mut self, delay: Duration) -> Self {
        self.stream_chunk_delay = delay;
        self
    }

    pub fn chain(&self) -> &ModelFallbackChain {
        &self.chain
    }

    async fn complete(
        &self,
        messages: &[Message],
        system: &str,
    ) -> FallbackResult<(LlmResponse, FallbackExecutionLog)> {
        self.chain
            .execute_with_fallback(|model| {
                let provider = Arc::clone(&self.provider);
                let messages = messages.to_vec();
                let system = system.to_string();
                async move {
                    provider
                        .send_message(messages, Some(system), LlmRequestOptions::for_model(model))
                        .await
                }
            })
            .await
    }

    /// Produce the assistant reply for a conversation.
    ///
    /// When every model fails with a travel context in the prompt, the turn is
    /// retried once without it.
    pub async fn generate_reply(
        &self,
        messages: &[ChatMessage],
        travelers: &[Traveler],
        travel_context: Option<&str>,
    ) -> AppResult<AdvisorReply> {
        if messages.is_empty() {
            return Err(AppError::validation("conversation has no messages"));
        }

        let started = Instant::now();
        let llm_messages: Vec<Message> = messages.iter().map(ChatMessage::to_llm_message).collect();
        let travel_context = travel_context.map(str::trim).filter(|c| !c.is_empty());

        let system = build_system_prompt(travelers, travel_context);
        let outcome = match self.complete(&llm_messages, &system).await {
            Err(FallbackError::Cancelled) => return Err(FallbackError::Cancelled.into()),
            Err(e) if travel_context.is_some() => {
                warn!("Completion with travel context failed ({}), retrying without it", e);
                let plain = build_system_prompt(travelers, None);
                self.complete(&llm_messages, &plain).await
            }
            other => other,
        };

        let (response, attempts) = match outcome {
            Ok(done) => done,
            Err(FallbackError::Cancelled) => return Err(FallbackError::Cancelled.into()),
            Err(e) => {
                warn!("All models failed: {}", e);
                return Err(AppError::service_unavailable(SERVICE_UNAVAILABLE_MESSAGE));
            }
        };

        if response.is_truncated() {
            warn!(model = %response.model, "Reply hit the token limit, expecting truncated JSON");
        }
        debug!(
            length = response.text().len(),
            model = %response.model,
            "Received raw reply"
        );

        let (normalized, recovery_tier) = normalize_with_tier(response.text());
        let extraction = extract_recommendations(
            &normalized.conversational_response,
            Some(normalized.structured_recommendations.as_slice()),
        );

        let turn_id = Uuid::new_v4();
        let recommendations: Vec<RecommendationRecord> = extraction
            .recommendations
            .into_iter()
            .map(|mut record| {
                record.id = format!("{}_{}", turn_id, record.id);
                record
            })
            .collect();

        let total_tokens = response.usage.total_tokens();
        let mut message = ChatMessage::assistant(normalized.conversational_response);
        if normalized.structured_recommendations.is_empty() {
            message.structured_recommendations = None;
        } else {
            message.structured_recommendations = Some(normalized.structured_recommendations);
        }
        message.metadata = Some(MessageMetadata {
            model_used: Some(response.model.clone()),
            tokens_used: (total_tokens > 0).then_some(total_tokens),
            response_time: Some(started.elapsed().as_millis() as u64),
        });

        info!(
            model = %response.model,
            tier = %recovery_tier,
            recommendations = recommendations.len(),
            "Advisor reply ready"
        );

        Ok(AdvisorReply {
            message,
            recommendations,
            recovery_tier,
            attempts,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        })
    }

    /// Produce the reply and deliver it as stream events.
    ///
    /// Emits text deltas, then the recommendations, then usage, then a
    /// completion marker. A failed turn emits a single error event.
    pub async fn stream_reply(
        &self,
        messages: &[ChatMessage],
        travelers: &[Traveler],
        travel_context: Option<&str>,
        tx: mpsc::Sender<AdvisorStreamEvent>,
    ) -> AppResult<AdvisorReply> {
        let reply = match self.generate_reply(messages, travelers, travel_context).await {
            Ok(reply) => reply,
            Err(e) => {
                let code = match &e {
                    AppError::Validation(_) => "validation",
                    AppError::ServiceUnavailable(_) => "service_unavailable",
                    _ => "internal",
                };
                // Best effort: the receiver may already be gone.
                let _ = tx
                    .send(AdvisorStreamEvent::Error {
                        message: e.to_string(),
                        code: Some(code.to_string()),
                    })
                    .await;
                return Err(e);
            }
        };

        let send = |event: AdvisorStreamEvent| {
            let tx = tx.clone();
            async move {
                tx.send(event)
                    .await
                    .map_err(|e| AppError::internal(format!("Channel error: {}", e)))
            }
        };

        for chunk in word_chunks(&reply.message.content) {
            send(AdvisorStreamEvent::TextDelta { content: chunk }).await?;
            if !self.stream_chunk_delay.is_zero() {
                tokio::time::sleep(self.stream_chunk_delay).await;
            }
        }

        send(AdvisorStreamEvent::Recommendations {
            recommendations: reply.recommendations.clone(),
        })
        .await?;
        send(AdvisorStreamEvent::Usage {
            input_tokens: reply.input_tokens,
            output_tokens: reply.output_tokens,
        })
        .await?;
        send(AdvisorStreamEvent::Complete {
            model: reply
                .message
                .metadata
                .as_ref()
                .and_then(|m| m.model_used.clone()),
        })
        .await?;

        Ok(reply)
    }
}
