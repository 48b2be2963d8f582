//! Quick-Start Prompt Generator
//!
//! Turns the sidebar selections (travelers, destination, dates, budget,
//! cultural settings) into ready-to-send user questions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::traveler::{CulturalSettings, Mobility, TravelPreferences, Traveler};

/// What the generated question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusType {
    #[default]
    General,
    Activities,
    Dining,
    Accommodation,
    Transportation,
}

/// Inputs for prompt generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptGeneratorOptions {
    pub travelers: Vec<Traveler>,
    #[serde(default)]
    pub travel_preferences: TravelPreferences,
    #[serde(default)]
    pub cultural_settings: CulturalSettings,
    #[serde(default)]
    pub focus_type: FocusType,
}

impl PromptGeneratorOptions {
    fn with_focus(&self, focus_type: FocusType) -> Self {
        Self {
            focus_type,
            ..self.clone()
        }
    }
}

/// Community-specific venue requests, keyed by background substrings.
const CULTURAL_INSIGHTS: &[(&[&str], &str)] = &[
    (
        &["indian", "pakistani", "bangladeshi", "sri_lankan", "south_asian"],
        "Please prioritize vegetarian-friendly dining with authentic Indian/South Asian restaurants, Hindu temples or cultural centers, traditional spice markets, and venues with comfortable seating for seniors",
    ),
    (
        &["chinese", "taiwanese", "hong_kong"],
        "Please include authentic Chinese restaurants in cultural districts, traditional tea houses, temples, and markets where the local Chinese community gathers",
    ),
    (
        &["mexican", "hispanic", "latino"],
        "Please include authentic Mexican/Latino restaurants, cultural plazas, art districts, traditional markets, and family-friendly venues with live music",
    ),
    (
        &["middle_eastern", "arabic", "persian", "turkish"],
        "Please include halal dining options, mosques or Islamic cultural centers, traditional bazaars, and Middle Eastern restaurants frequented by the local community",
    ),
    (
        &["african", "ethiopian", "nigerian"],
        "Please include authentic African restaurants, cultural centers, music venues that celebrate African heritage, and community gathering spaces",
    ),
    (
        &["jewish", "israeli"],
        "Please include kosher dining options, synagogues or Jewish cultural centers, heritage museums, and restaurants popular with the local Jewish community",
    ),
];

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// "2 adults, 1 child, and 1 senior"
pub fn family_description(travelers: &[Traveler]) -> String {
    match travelers.len() {
        0 => return "myself".to_string(),
        1 => return "1 person".to_string(),
        _ => {}
    }

    let seniors = travelers.iter().filter(|t| t.is_senior()).count();
    let children = travelers.iter().filter(|t| t.is_child()).count();
    let adults = travelers.len() - seniors - children;

    let mut groups = Vec::new();
    if adults > 0 {
        groups.push(pluralize(adults, "adult", "adults"));
    }
    if children > 0 {
        groups.push(pluralize(children, "child", "children"));
    }
    if seniors > 0 {
        groups.push(pluralize(seniors, "senior", "seniors"));
    }

    match groups.as_slice() {
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
        [] => "myself".to_string(),
    }
}

/// `2025-07-04` -> `7/4/2025`; unparseable dates pass through.
fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

fn cultural_insights(settings: &CulturalSettings) -> Option<String> {
    let insights: Vec<&str> = settings
        .cultural_background
        .iter()
        .flat_map(|culture| {
            let lower = culture.to_lowercase();
            CULTURAL_INSIGHTS
                .iter()
                .filter(move |(keys, _)| keys.iter().any(|k| lower.contains(k)))
                .map(|(_, insight)| *insight)
        })
        .collect();
    (!insights.is_empty()).then(|| insights.join("; "))
}

fn family_considerations(travelers: &[Traveler]) -> Option<String> {
    let has_children = travelers.iter().any(Traveler::is_child);
    let has_seniors = travelers.iter().any(Traveler::is_senior);
    let has_reduced_mobility = travelers.iter().any(|t| t.mobility != Mobility::High);

    let mut considerations = Vec::new();
    if has_children {
        considerations.push("include family-friendly activities with interactive experiences");
    }
    if has_seniors {
        considerations.push(
            "prioritize venues with comfortable seating, elevators or ramps, and shorter walking distances",
        );
    }
    if has_reduced_mobility {
        considerations.push(
            "ensure wheelchair accessibility, avoid stairs-only access, and suggest reserve-ahead options",
        );
    }
    if has_seniors || has_reduced_mobility {
        considerations
            .push("recommend quieter time slots and mention any senior or accessibility discounts");
    }

    (!considerations.is_empty())
        .then(|| format!("We prefer venues that {}", considerations.join(", ")))
}

fn focus_request(focus: FocusType, settings: &CulturalSettings) -> String {
    let cultural_note = if settings.cultural_background.is_empty() {
        String::new()
    } else {
        format!(
            " We come from {} backgrounds and would appreciate culturally authentic experiences.",
            settings.cultural_background.join(" and ")
        )
    };
    let dietary_note = if settings.dietary_restrictions.is_empty() {
        String::new()
    } else {
        format!(
            " We have {} dietary requirements.",
            settings.dietary_restrictions.join(" and ")
        )
    };

    match focus {
        FocusType::Activities => format!(
            "What activities and attractions would you recommend for our group?{} Please include both mainstream attractions and culturally significant places.",
            cultural_note
        ),
        FocusType::Dining => format!(
            "What are the best restaurants and dining experiences for families?{}{} We'd love both authentic cultural restaurants and family-friendly options.",
            cultural_note, dietary_note
        ),
        FocusType::Accommodation => format!(
            "What type of accommodation would work best for our group, and do you have specific recommendations?{} Please consider cultural preferences and family needs.",
            cultural_note
        ),
        FocusType::Transportation => format!(
            "What's the best way to get around and what transportation options would you recommend for our group?{} Please consider accessibility and cultural considerations.",
            cultural_note
        ),
        FocusType::General => format!(
            "What would you recommend for activities, dining, and places to stay?{}{} Please include both popular attractions and authentic cultural experiences.",
            cultural_note, dietary_note
        ),
    }
}

/// Compose one user question from the selections.
pub fn generate_base_prompt(options: &PromptGeneratorOptions) -> String {
    let prefs = &options.travel_preferences;
    let mut parts = Vec::new();

    let destination = prefs.destination.trim();
    if destination.is_empty() {
        parts.push("I'm planning a family trip".to_string());
    } else {
        parts.push(format!("I'm planning a trip to {}", destination));
    }

    if !options.travelers.is_empty() {
        parts.push(format!("for {}", family_description(&options.travelers)));
    }

    if !prefs.check_in.trim().is_empty() && !prefs.check_out.trim().is_empty() {
        parts.push(format!(
            "from {} to {}",
            display_date(&prefs.check_in),
            display_date(&prefs.check_out)
        ));
    }

    if !prefs.budget.trim().is_empty() {
        parts.push(format!("with a {} budget", prefs.budget.trim().to_lowercase()));
    }

    if let Some(insights) = cultural_insights(&options.cultural_settings) {
        parts.push(format!(". {}", insights));
    }

    if let Some(considerations) = family_considerations(&options.travelers) {
        parts.push(format!(". {}", considerations));
    }

    parts.push(format!(
        ". {}",
        focus_request(options.focus_type, &options.cultural_settings)
    ));

    parts.join(" ")
}

/// Up to three questions suited to the group.
///
/// Always a general question, then activities when children travel, dining
/// when cultural or dietary settings exist, transportation when someone has
/// reduced mobility.
pub fn generate_quick_prompts(options: &PromptGeneratorOptions) -> Vec<String> {
    let settings = &options.cultural_settings;
    let mut focuses = vec![FocusType::General];

    if options.travelers.iter().any(Traveler::is_child) {
        focuses.push(FocusType::Activities);
    }
    if !settings.dietary_restrictions.is_empty() || !settings.cultural_background.is_empty() {
        focuses.push(FocusType::Dining);
    }
    if options.travelers.iter().any(|t| t.mobility != Mobility::High) {
        focuses.push(FocusType::Transportation);
    }

    focuses
        .into_iter()
        .take(3)
        .map(|focus| generate_base_prompt(&options.with_focus(focus)))
        .collect()
}

/// True when there is enough to ask a meaningful question.
pub fn has_valid_selections(options: &PromptGeneratorOptions) -> bool {
    !options.travelers.is_empty() || !options.travel_preferences.destination.trim().is_empty()
}
