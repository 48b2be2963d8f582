//! Recommendation Data Model
//!
//! The record type every response path produces, plus the closed label sets
//! it is built from. Labels serialize exactly as the display layer expects
//! them ("Kids Love", "$$", "Fully accessible", ...).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Display-length ceiling for record descriptions, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

/// Recommendation category.
///
/// Declaration order is significant: it breaks ties when classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Attraction,
    Restaurant,
    Transport,
    Accommodation,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Attraction,
        Category::Restaurant,
        Category::Transport,
        Category::Accommodation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Attraction => "attraction",
            Category::Restaurant => "restaurant",
            Category::Transport => "transport",
            Category::Accommodation => "accommodation",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Attraction
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "attraction" | "attractions" | "activity" | "activities" | "sight" | "sightseeing" => {
                Ok(Category::Attraction)
            }
            "restaurant" | "restaurants" | "dining" | "food" | "cafe" => Ok(Category::Restaurant),
            "transport" | "transportation" | "transit" | "getting around" => {
                Ok(Category::Transport)
            }
            "accommodation" | "accommodations" | "hotel" | "hotels" | "lodging" | "stay" => {
                Ok(Category::Accommodation)
            }
            other => Err(CoreError::parse(format!("unknown category: {}", other))),
        }
    }
}

/// Audience a recommendation suits. A record may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "All Ages")]
    AllAges,
    #[serde(rename = "Kids Love")]
    KidsLove,
    #[serde(rename = "Adults")]
    Adults,
    #[serde(rename = "Seniors")]
    Seniors,
    #[serde(rename = "Teens")]
    Teens,
}

impl AgeGroup {
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::AllAges => "All Ages",
            AgeGroup::KidsLove => "Kids Love",
            AgeGroup::Adults => "Adults",
            AgeGroup::Seniors => "Seniors",
            AgeGroup::Teens => "Teens",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let key = s.trim().to_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "all ages" | "all" | "everyone" | "family" => Ok(AgeGroup::AllAges),
            "kids love" | "kids" | "children" | "child" => Ok(AgeGroup::KidsLove),
            "adults" | "adult" => Ok(AgeGroup::Adults),
            "seniors" | "senior" | "elderly" => Ok(AgeGroup::Seniors),
            "teens" | "teen" | "teenagers" | "youth" => Ok(AgeGroup::Teens),
            _ => Err(CoreError::parse(format!("unknown age group: {}", s.trim()))),
        }
    }
}

/// Coarse price tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "Free")]
    Free,
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl PriceTier {
    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Free => "Free",
            PriceTier::Budget => "$",
            PriceTier::Moderate => "$$",
            PriceTier::Expensive => "$$$",
            PriceTier::Luxury => "$$$$",
        }
    }

    /// Tier for a count of `$` signs; counts above four saturate.
    pub fn from_dollar_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(PriceTier::Budget),
            2 => Some(PriceTier::Moderate),
            3 => Some(PriceTier::Expensive),
            _ => Some(PriceTier::Luxury),
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PriceTier {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("free") {
            return Ok(PriceTier::Free);
        }
        if !trimmed.is_empty() && trimmed.chars().all(|c| c == '$') {
            if let Some(tier) = PriceTier::from_dollar_count(trimmed.len()) {
                return Ok(tier);
            }
        }
        Err(CoreError::parse(format!("unknown price tier: {}", trimmed)))
    }
}

/// Accessibility level of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    #[serde(rename = "Fully accessible")]
    Full,
    #[serde(rename = "Limited accessibility")]
    Limited,
    #[serde(rename = "Not accessible")]
    None,
}

impl Accessibility {
    pub fn label(&self) -> &'static str {
        match self {
            Accessibility::Full => "Fully accessible",
            Accessibility::Limited => "Limited accessibility",
            Accessibility::None => "Not accessible",
        }
    }
}

impl std::fmt::Display for Accessibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Accessibility {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "fully accessible" | "full" | "fully" | "accessible" | "wheelchair accessible" => {
                Ok(Accessibility::Full)
            }
            "limited accessibility" | "limited" | "partial" | "partially accessible" => {
                Ok(Accessibility::Limited)
            }
            "not accessible" | "none" | "inaccessible" => Ok(Accessibility::None),
            other => Err(CoreError::parse(format!("unknown accessibility: {}", other))),
        }
    }
}

/// Dietary accommodation offered by a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DietaryOption {
    Vegetarian,
    Vegan,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    Halal,
    Kosher,
    #[serde(rename = "Dairy-Free")]
    DairyFree,
}

impl DietaryOption {
    pub fn label(&self) -> &'static str {
        match self {
            DietaryOption::Vegetarian => "Vegetarian",
            DietaryOption::Vegan => "Vegan",
            DietaryOption::GlutenFree => "Gluten-Free",
            DietaryOption::Halal => "Halal",
            DietaryOption::Kosher => "Kosher",
            DietaryOption::DairyFree => "Dairy-Free",
        }
    }
}

impl std::fmt::Display for DietaryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DietaryOption {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "vegetarian" => Ok(DietaryOption::Vegetarian),
            "vegan" => Ok(DietaryOption::Vegan),
            "gluten-free" => Ok(DietaryOption::GlutenFree),
            "halal" => Ok(DietaryOption::Halal),
            "kosher" => Ok(DietaryOption::Kosher),
            "dairy-free" | "lactose-free" => Ok(DietaryOption::DairyFree),
            _ => Err(CoreError::parse(format!("unknown dietary option: {}", s.trim()))),
        }
    }
}

/// Part of the day a recommendation is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" | "night" => Ok(TimeSlot::Evening),
            other => Err(CoreError::parse(format!("unknown time slot: {}", other))),
        }
    }
}

/// One recommendation card, produced fresh for each assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    /// Unique within one assistant turn
    pub id: String,
    pub title: String,
    pub category: Category,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceTier>,
    pub age_group: Vec<AgeGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Only present for restaurants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_options: Option<Vec<DietaryOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
}

impl RecommendationRecord {
    /// Create a record with the mandatory fields and every optional field empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            description: description.into(),
            rating: None,
            duration: None,
            price: None,
            age_group: vec![AgeGroup::AllAges],
            accessibility: None,
            location: None,
            dietary_options: None,
            time_slot: None,
        }
    }

    /// Check the record invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation(format!("record {} has an empty title", self.id)));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::validation(format!(
                "record {} has an empty description",
                self.id
            )));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(CoreError::validation(format!(
                    "record {} rating {} outside [0, 5]",
                    self.id, rating
                )));
            }
        }
        if self.age_group.is_empty() {
            return Err(CoreError::validation(format!("record {} has no age group", self.id)));
        }
        if self.dietary_options.is_some() && self.category != Category::Restaurant {
            return Err(CoreError::validation(format!(
                "record {} carries dietary options but is a {}",
                self.id, self.category
            )));
        }
        Ok(())
    }
}
