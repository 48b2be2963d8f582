//! Travel Advisor Integration Tests
//!
//! Full advisor turns against an in-memory provider that replays queued
//! replies: fallback order, context retry, cancellation, truncated replies and
//! simulated streaming.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use flexitrip::models::chat::{ChatMessage, ChatRole};
use flexitrip::models::traveler::Traveler;
use flexitrip::services::fallback::{FallbackError, ModelFallbackChain};
use flexitrip::{AdvisorStreamEvent, AppError, Category, TravelAdvisor};
use flexitrip_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
    StopReason, UsageStats,
};
use flexitrip_response::RecoveryTier;

use super::init_tracing;

/// One recorded `send_message` call.
#[derive(Debug, Clone)]
struct Call {
    model: String,
    system: String,
    message_count: usize,
}

/// Provider replaying queued outcomes in call order.
struct QueuedProvider {
    config: ProviderConfig,
    queue: Mutex<VecDeque<LlmResult<(String, StopReason)>>>,
    calls: Mutex<Vec<Call>>,
}

impl QueuedProvider {
    fn new(outcomes: Vec<LlmResult<(String, StopReason)>>) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            queue: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for QueuedProvider {
    fn name(&self) -> &'static str {
        "queued"
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
        let model = request_options
            .model_override
            .unwrap_or_else(|| self.config.model.clone());
        self.calls.lock().unwrap().push(Call {
            model: model.clone(),
            system: system.unwrap_or_default(),
            message_count: messages.len(),
        });

        let next = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::ProviderUnavailable {
                    message: "queue exhausted".to_string(),
                })
            });
        let (content, stop_reason) = next?;
        Ok(LlmResponse {
            content: Some(content),
            stop_reason,
            usage: UsageStats {
                input_tokens: 900,
                output_tokens: 300,
            },
            model,
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn ok(content: &str) -> LlmResult<(String, StopReason)> {
    Ok((content.to_string(), StopReason::EndTurn))
}

fn server_error() -> LlmResult<(String, StopReason)> {
    Err(LlmError::ServerError {
        message: "upstream overloaded".to_string(),
        status: Some(502),
    })
}

fn advisor(provider: Arc<QueuedProvider>) -> TravelAdvisor {
    let chain = ModelFallbackChain::new(vec![
        "openrouter/horizon-beta".to_string(),
        "openai/gpt-4o-mini".to_string(),
    ]);
    TravelAdvisor::new(provider, chain)
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("We land in Barcelona on Friday."),
        ChatMessage::assistant("Lovely! Who is travelling?"),
        ChatMessage::user("Me, my son (8) and my father (70). What should we do?"),
    ]
}

fn travelers() -> Vec<Traveler> {
    vec![
        Traveler::new("s-1", "Elena", 41),
        Traveler::new("s-1", "Mateo", 8),
        Traveler::new("s-1", "Jordi", 70),
    ]
}

const BARCELONA_REPLY: &str = r#"{
  "conversational_response": "Barcelona works well for all three of you.",
  "structured_recommendations": [
    {"title": "Park Guell", "category": "attraction", "description": "Mosaic terraces with shaded benches and city views", "timeSlot": "morning", "accessibility": "Limited accessibility"},
    {"title": "La Boqueria", "category": "restaurant", "description": "Busy food market with fresh juice and tapas counters", "price": "$$", "timeSlot": "afternoon"}
  ]
}"#;

#[tokio::test]
async fn test_turn_with_structured_reply() {
    init_tracing();
    let provider = QueuedProvider::new(vec![ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider.clone());

    let reply = advisor
        .generate_reply(&conversation(), &travelers(), None)
        .await
        .unwrap();

    assert_eq!(reply.message.role, ChatRole::Assistant);
    assert_eq!(reply.message.content, "Barcelona works well for all three of you.");
    assert_eq!(reply.recovery_tier, RecoveryTier::DirectParse);
    assert_eq!(reply.recommendations.len(), 2);
    assert_eq!(reply.recommendations[1].category, Category::Restaurant);

    let prefix = reply.recommendations[0].id.strip_suffix("_rec_0").unwrap();
    assert_eq!(reply.recommendations[1].id, format!("{}_rec_1", prefix));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].message_count, 3);
    assert!(calls[0].system.contains("- Jordi (70): Mobility level: high"));

    let metadata = reply.message.metadata.unwrap();
    assert_eq!(metadata.tokens_used, Some(1200));
    assert!(metadata.response_time.is_some());
}

#[tokio::test]
async fn test_ids_are_unique_across_turns() {
    let provider = QueuedProvider::new(vec![ok(BARCELONA_REPLY), ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider);

    let first = advisor.generate_reply(&conversation(), &[], None).await.unwrap();
    let second = advisor.generate_reply(&conversation(), &[], None).await.unwrap();
    assert_ne!(first.recommendations[0].id, second.recommendations[0].id);
}

#[tokio::test]
async fn test_fallback_to_second_model() {
    let provider = QueuedProvider::new(vec![server_error(), ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider.clone());

    let reply = advisor.generate_reply(&conversation(), &[], None).await.unwrap();

    let models: Vec<String> = provider.calls().into_iter().map(|c| c.model).collect();
    assert_eq!(models, vec!["openrouter/horizon-beta", "openai/gpt-4o-mini"]);
    assert_eq!(reply.attempts.successful_model.as_deref(), Some("openai/gpt-4o-mini"));
    assert_eq!(
        reply.message.metadata.unwrap().model_used.as_deref(),
        Some("openai/gpt-4o-mini")
    );
}

#[tokio::test]
async fn test_context_dropped_after_total_failure() {
    init_tracing();
    let provider = QueuedProvider::new(vec![server_error(), server_error(), ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider.clone());

    let reply = advisor
        .generate_reply(&conversation(), &travelers(), Some("Hotel near Sagrada Familia"))
        .await
        .unwrap();
    assert_eq!(reply.recommendations.len(), 2);

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].system.contains("Hotel near Sagrada Familia"));
    assert!(calls[1].system.contains("Hotel near Sagrada Familia"));
    assert!(!calls[2].system.contains("CURRENT TRAVEL CONTEXT"));
    assert_eq!(calls[2].model, "openrouter/horizon-beta");
}

#[tokio::test]
async fn test_all_models_failed_is_service_unavailable() {
    let provider = QueuedProvider::new(vec![server_error(), server_error()]);
    let advisor = advisor(provider.clone());

    let err = advisor
        .generate_reply(&conversation(), &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));
    // No travel context, so no second round.
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn test_cancellation_stops_the_turn() {
    let provider = QueuedProvider::new(vec![Err(LlmError::Other {
        message: "request cancelled by caller".to_string(),
    })]);
    let advisor = advisor(provider.clone());

    let err = advisor
        .generate_reply(&conversation(), &[], Some("Destination: Barcelona"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Fallback(FallbackError::Cancelled)));
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_truncated_reply_is_recovered() {
    let cut = BARCELONA_REPLY.find("\"price\"").unwrap();
    let truncated = &BARCELONA_REPLY[..cut + 9];
    let provider = QueuedProvider::new(vec![Ok((truncated.to_string(), StopReason::MaxTokens))]);
    let advisor = advisor(provider);

    let reply = advisor.generate_reply(&conversation(), &[], None).await.unwrap();
    assert_eq!(reply.recovery_tier, RecoveryTier::TruncationRepair);
    assert_eq!(reply.message.content, "Barcelona works well for all three of you.");
    assert_eq!(reply.recommendations[0].title, "Park Guell");
    assert!(reply.recommendations.iter().all(|r| r.validate().is_ok()));
}

#[tokio::test]
async fn test_stream_reply_delivers_text_then_cards() {
    let provider = QueuedProvider::new(vec![ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider).with_stream_chunk_delay(Duration::from_millis(1));
    let (tx, mut rx) = mpsc::channel(128);

    let handle = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let reply = advisor
        .stream_reply(&conversation(), &travelers(), None, tx)
        .await
        .unwrap();
    let events = handle.await.unwrap();

    let first_non_text = events
        .iter()
        .position(|e| !matches!(e, AdvisorStreamEvent::TextDelta { .. }))
        .unwrap();
    let text: String = events[..first_non_text]
        .iter()
        .filter_map(|e| match e {
            AdvisorStreamEvent::TextDelta { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, reply.message.content);
    assert_eq!(first_non_text, 8);

    match &events[first_non_text] {
        AdvisorStreamEvent::Recommendations { recommendations } => {
            assert_eq!(recommendations, &reply.recommendations)
        }
        other => panic!("expected recommendations, got {:?}", other),
    }
    assert!(events.last().unwrap().is_terminal());
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn test_stream_reply_with_closed_receiver() {
    let provider = QueuedProvider::new(vec![ok(BARCELONA_REPLY)]);
    let advisor = advisor(provider);
    let (tx, rx) = mpsc::channel(4);
    drop(rx);

    let result = advisor.stream_reply(&conversation(), &[], None, tx).await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}
