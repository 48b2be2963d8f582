//! System Prompt Builder
//!
//! Builds the age-aware system prompt sent with every completion. The prompt
//! carries the traveler profiles, per-traveler guidance, cultural and dietary
//! notes, and the JSON contract the response normalizer expects back.

use serde::Serialize;

use crate::models::traveler::{Mobility, Traveler};

/// Traveler fields shown to the model.
#[derive(Serialize)]
struct TravelerContext<'a> {
    name: &'a str,
    age: u32,
    mobility: Mobility,
    interests: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    cultural: Option<&'a str>,
    dietary: &'a [String],
}

const KEY_PRINCIPLES: &str = "\
- Always consider ALL travelers when making recommendations
- Explain WHY each suggestion works for the group's diverse needs
- Prioritize safety for children and accessibility for seniors
- Suggest alternatives for different energy levels and interests
- Include practical details like walking distances, seating availability, and timing
- Consider cultural preferences and dietary restrictions in restaurant recommendations
- Provide specific, actionable advice rather than generic suggestions";

const CULTURAL_STRATEGY: &str = "\
When cultural backgrounds are specified, prioritize locations that align with documented travel patterns and preferences of these populations. Consider:

- HERITAGE & RELIGIOUS SITES: Temples, mosques, churches, cultural centers relevant to their background
- CULTURAL DISTRICTS: Neighborhoods with authentic restaurants, shops, and community centers
- TRADITIONAL MARKETS: Places to find familiar foods, spices, and cultural items
- COMMUNITY GATHERING SPACES: Parks, plazas, and venues popular with their cultural community
- AUTHENTIC DINING: Restaurants frequented by these populations (not just tourist versions)
- CULTURAL EVENTS: Festivals, performances, and celebrations relevant to their traditions
- FAMILY-FRIENDLY VENUES: Locations accommodating multi-generational cultural family structures

RECOMMENDATION PRIORITIZATION:
1. Start with culturally significant and authentic locations where these communities actually visit
2. Prioritize places recommended in travel blogs and reviews by people from that cultural background
3. Include venues popular with local cultural community members and organizations
4. Focus on restaurants, temples, and districts that local communities actually frequent
5. Include mainstream attractions that also appeal to their cultural preferences
6. Ensure all recommendations are accessible and appropriate for the age groups present
7. Explain why each recommendation resonates with their cultural background and community
8. Include practical cultural details like halal/kosher availability, prayer times, cultural etiquette";

/// The response shape the normalizer decodes, plus the rules that keep the
/// model's JSON short enough to survive the token limit.
pub const RESPONSE_CONTRACT: &str = r#"CRITICAL: You MUST respond ONLY with valid JSON in this exact format. Do not include any text before or after the JSON:

{
  "conversational_response": "Your friendly, detailed travel advice explaining recommendations and reasoning...",
  "structured_recommendations": [
    {
      "title": "Specific Place Name",
      "category": "attraction",
      "description": "Detailed description of the place and why it works for this group",
      "rating": 4.5,
      "duration": "2 hours",
      "price": "$$",
      "ageGroup": ["All Ages"],
      "accessibility": "Fully accessible",
      "location": "Specific address or area",
      "timeSlot": "evening"
    }
  ]
}

MANDATORY RULES:
1. Response must be ONLY valid JSON - no extra text
2. Use only these categories: "attraction", "restaurant", "transport", "accommodation"
3. Include 6-10 specific, real places in structured_recommendations
4. Each title must be an actual place name (not description)
5. DO NOT use backslashes or escape characters in descriptions - use simple text only
6. Keep descriptions under 60 characters - be concise
7. Keep conversational_response under 300 characters - be brief
8. NEVER use line breaks or special characters in strings
9. End JSON with proper closing braces - ensure complete response
10. CRITICAL: Test your JSON is valid before responding"#;

/// Venue preferences keyed by cultural background substrings. First match wins.
const CULTURAL_PREFERENCES: &[(&[&str], &str)] = &[
    (
        &["chinese", "japanese", "korean", "vietnamese", "thai", "asian"],
        "Temples, gardens, cultural museums, authentic cuisine districts, traditional markets, tea houses",
    ),
    (
        &["hispanic", "latino", "mexican", "spanish", "colombian", "guatemalan", "salvadoran"],
        "Cultural plazas, art districts, vibrant neighborhoods, family venues, music/dance locations",
    ),
    (
        &["italian", "german", "irish", "french", "british", "european", "polish", "russian"],
        "Historical sites, museums, architectural landmarks, traditional pubs/cafes, heritage districts",
    ),
    (
        &["middle_eastern", "arabic", "persian", "turkish", "lebanese", "egyptian"],
        "Mosques, halal dining, cultural centers, traditional bazaars, Islamic architecture",
    ),
    (
        &["african", "ethiopian", "nigerian", "ghanaian", "kenyan", "black"],
        "Cultural centers, community venues, music/arts locations, African diaspora sites",
    ),
    (
        &["indian", "pakistani", "bangladeshi", "sri_lankan", "south_asian"],
        "Temples, spice markets, vegetarian restaurants, cultural festivals, traditional arts",
    ),
    (
        &["jewish", "hebrew", "israeli"],
        "Synagogues, kosher dining, Jewish cultural centers, Holocaust museums, heritage sites",
    ),
    (
        &["native_american", "indigenous", "tribal"],
        "Cultural centers, museums, traditional craft shops, sacred sites, powwow venues",
    ),
];

const DEFAULT_CULTURAL_PREFERENCE: &str =
    "Community cultural centers, authentic restaurants, traditional shops, heritage sites";

/// One guidance line per traveler, chosen by age band.
pub fn age_guidelines(travelers: &[Traveler]) -> String {
    travelers
        .iter()
        .map(|t| {
            let guidance = match t.age {
                0..=5 => "Needs stroller-friendly paths, frequent breaks, nap times, simple activities, safety priority, child-proofed environments".to_string(),
                6..=12 => "Enjoys interactive activities, hands-on experiences, shorter attention spans, playground access, kid-friendly food, educational fun".to_string(),
                13..=17 => {
                    let interests = if t.interests.is_empty() {
                        "varied activities".to_string()
                    } else {
                        t.interests.join(", ")
                    };
                    format!(
                        "Interests: {}, social opportunities, photo spots, some independence, diverse food options",
                        interests
                    )
                }
                age if age >= 65 => format!(
                    "Mobility level: {}, needs accessible venues, comfortable seating, shorter walking distances, cultural interests, comfortable transport",
                    t.mobility
                ),
                _ => "Can handle most activities, good for coordinating group needs, flexible with timing and activities".to_string(),
            };
            format!("- {} ({}): {}", t.name, t.age, guidance)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cultural_preference(culture: &str) -> &'static str {
    let lower = culture.to_lowercase();
    CULTURAL_PREFERENCES
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| lower.contains(k)))
        .map(|(_, preference)| *preference)
        .unwrap_or(DEFAULT_CULTURAL_PREFERENCE)
}

/// Push `item` unless an equal item is already present.
fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

/// Cultural backgrounds and dietary restrictions across the group.
pub fn cultural_guidelines(travelers: &[Traveler]) -> String {
    let mut cultures = Vec::new();
    let mut dietary = Vec::new();
    for traveler in travelers {
        if let Some(culture) = traveler.cultural_background.as_deref() {
            if !culture.trim().is_empty() {
                push_unique(&mut cultures, culture);
            }
        }
        for restriction in &traveler.dietary_restrictions {
            push_unique(&mut dietary, restriction);
        }
    }

    let mut lines = Vec::new();
    if !cultures.is_empty() {
        lines.push(format!("Cultural backgrounds: {}", cultures.join(", ")));
        lines.push(String::new());
        lines.push("CULTURAL POPULATION PREFERENCES:".to_string());
        for culture in &cultures {
            lines.push(format!("- {}: {}", culture, cultural_preference(culture)));
        }
        lines.push("- Prioritize culturally significant and heritage sites".to_string());
        lines.push("- Include authentic restaurants and cultural districts".to_string());
        lines.push("- Consider religious/cultural calendar and customs".to_string());
    }
    if !dietary.is_empty() {
        lines.push(format!("Dietary restrictions: {}", dietary.join(", ")));
        lines.push("- Ensure restaurant recommendations accommodate ALL dietary needs".to_string());
        lines.push("- Mention specific dishes or menu items that work for everyone".to_string());
    }

    if lines.is_empty() {
        "No specific cultural or dietary restrictions noted.".to_string()
    } else {
        lines.join("\n")
    }
}

fn travelers_json(travelers: &[Traveler]) -> String {
    let context: Vec<TravelerContext<'_>> = travelers
        .iter()
        .map(|t| TravelerContext {
            name: &t.name,
            age: t.age,
            mobility: t.mobility,
            interests: &t.interests,
            cultural: t.cultural_background.as_deref(),
            dietary: &t.dietary_restrictions,
        })
        .collect();
    // Serializing borrowed strings and numbers cannot fail.
    serde_json::to_string_pretty(&context).unwrap_or_else(|_| "[]".to_string())
}

/// Build the system prompt for a group of travelers.
///
/// A non-blank `travel_context` is appended as a `CURRENT TRAVEL CONTEXT`
/// section.
pub fn build_system_prompt(travelers: &[Traveler], travel_context: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(8);

    parts.push(
        "You are FlexiTrip, an AI travel assistant specializing in multi-generational family travel planning."
            .to_string(),
    );
    parts.push(format!("CURRENT TRAVELERS:\n{}", travelers_json(travelers)));

    let age_notes = age_guidelines(travelers);
    if !age_notes.is_empty() {
        parts.push(format!("AGE-SPECIFIC CONSIDERATIONS:\n{}", age_notes));
    }

    parts.push(format!(
        "CULTURAL & DIETARY CONSIDERATIONS:\n{}",
        cultural_guidelines(travelers)
    ));
    parts.push(format!("KEY PRINCIPLES:\n{}", KEY_PRINCIPLES));
    parts.push(format!(
        "CULTURAL INTELLIGENCE & RECOMMENDATION STRATEGY:\n{}",
        CULTURAL_STRATEGY
    ));
    parts.push(RESPONSE_CONTRACT.to_string());
    parts.push(
        "Provide thoughtful, detailed recommendations that ensure everyone in this multi-generational group can enjoy the travel experience together."
            .to_string(),
    );

    if let Some(context) = travel_context.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(format!(
            "CURRENT TRAVEL CONTEXT:\n{}\n\nBased on this context, please provide personalized recommendations that consider all family members' needs, preferences, and constraints. Always include specific details about accessibility, age-appropriateness, and timing recommendations.",
            context
        ));
    }

    parts.join("\n\n")
}
