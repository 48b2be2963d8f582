//! Data Models
//!
//! Travelers, conversation messages, advisor settings and itinerary grouping.

pub mod chat;
pub mod itinerary;
pub mod settings;
pub mod traveler;

pub use chat::*;
pub use itinerary::*;
pub use settings::*;
pub use traveler::*;
