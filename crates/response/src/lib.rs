//! FlexiTrip Response
//!
//! The pure core of the travel advisor: contract recovery of the raw upstream
//! reply and extraction of recommendation records from it. Nothing in this
//! crate performs I/O or returns an error.
//!
//! ## Module Organization
//!
//! - `json_repair` - Balanced-object scanning and truncation repair
//! - `normalizer` - Four-tier `NormalizedResponse` recovery cascade
//! - `extractor` - Structured-hint mapping and prose heuristics

pub mod extractor;
pub mod json_repair;
pub mod normalizer;

// ── Normalizer ─────────────────────────────────────────────────────────
pub use normalizer::{
    normalize_response, normalize_with_tier, NormalizedResponse, RecoveryTier, GENERIC_RESPONSE,
};

// ── Extractor ──────────────────────────────────────────────────────────
pub use extractor::{extract_recommendations, has_recommendation_indicator, ExtractionResult};
