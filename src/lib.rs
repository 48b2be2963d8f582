//! FlexiTrip Advisor - Rust Backend Library
//!
//! Service layer of the FlexiTrip family travel advisor:
//! - Traveler, conversation and settings models
//! - System prompt and user prompt construction
//! - Model fallback over an OpenRouter chat-completion provider
//! - The advisor turn: response normalization and recommendation extraction

pub mod models;
pub mod services;
pub mod utils;

pub use flexitrip_core::{
    AdvisorStreamEvent, Category, RecommendationRecord, TimeSlot,
};
pub use flexitrip_response::{
    extract_recommendations, normalize_response, ExtractionResult, NormalizedResponse,
};
pub use models::{
    group_by_category, group_by_time_slot, AdvisorSettings, ChatMessage, Traveler,
};
pub use services::{AdvisorReply, TravelAdvisor};
pub use utils::error::{AppError, AppResult};
