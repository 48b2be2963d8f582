//! Traveler Models
//!
//! Traveler profiles and the trip-level selections (preferences, cultural
//! settings) that feed prompt construction. Persistence is the caller's job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Age from which a traveler is planned for as a senior.
pub const SENIOR_AGE: u32 = 65;
/// Travelers below this age are children.
pub const ADULT_AGE: u32 = 18;

/// How much walking and climbing a traveler manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mobility {
    #[default]
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Mobility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mobility::High => write!(f, "high"),
            Mobility::Medium => write!(f, "medium"),
            Mobility::Low => write!(f, "low"),
        }
    }
}

/// One member of the travelling group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    pub id: String,
    pub session_id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub mobility: Mobility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_background: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl Traveler {
    /// Create a traveler with a fresh id and default mobility.
    pub fn new(session_id: impl Into<String>, name: impl Into<String>, age: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            name: name.into(),
            age,
            mobility: Mobility::default(),
            relationship: None,
            interests: Vec::new(),
            cultural_background: None,
            dietary_restrictions: Vec::new(),
        }
    }

    pub fn with_mobility(mut self, mobility: Mobility) -> Self {
        self.mobility = mobility;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_cultural_background(mut self, background: impl Into<String>) -> Self {
        self.cultural_background = Some(background.into());
        self
    }

    pub fn with_dietary_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.dietary_restrictions = restrictions;
        self
    }

    pub fn is_child(&self) -> bool {
        self.age < ADULT_AGE
    }

    pub fn is_senior(&self) -> bool {
        self.age >= SENIOR_AGE
    }
}

/// Destination, dates and budget chosen for the trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPreferences {
    pub destination: String,
    /// ISO date (`YYYY-MM-DD`)
    pub check_in: String,
    /// ISO date (`YYYY-MM-DD`)
    pub check_out: String,
    pub budget: String,
    pub trip_type: Vec<String>,
}

/// Group-level cultural and dietary selections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalSettings {
    pub cultural_background: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub family_interests: Vec<String>,
}
