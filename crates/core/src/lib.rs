//! FlexiTrip Core
//!
//! Recommendation data model, error types and stream events for the FlexiTrip
//! workspace. This crate has no dependency on provider or application code
//! (HTTP clients, prompt building, configuration).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `recommendation` - `RecommendationRecord` and its closed label sets
//! - `streaming` - Advisor stream events and word chunking
//!
//! ## Design Principles
//!
//! 1. **No dependencies beyond serde/thiserror** - keeps build times minimal
//! 2. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod recommendation;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Recommendation Model ───────────────────────────────────────────────
pub use recommendation::{
    Accessibility, AgeGroup, Category, DietaryOption, PriceTier, RecommendationRecord, TimeSlot,
    MAX_DESCRIPTION_CHARS,
};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{word_chunks, AdvisorStreamEvent};
