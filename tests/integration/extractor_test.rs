//! Recommendation Extractor Integration Tests
//!
//! Structured-hint mapping and prose heuristics, end to end through
//! `extract_recommendations` and in combination with the normalizer.

use flexitrip::group_by_time_slot;
use flexitrip_core::{Accessibility, AgeGroup, Category, PriceTier, TimeSlot};
use flexitrip_response::{extract_recommendations, normalize_response};
use serde_json::json;

use super::init_tracing;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_museum_sentence_yields_one_record() {
    init_tracing();
    let result = extract_recommendations(
        "I recommend the City Museum: a fascinating collection of artifacts, wheelchair accessible, rated 4.5 stars, about 2 hours.",
        None,
    );

    assert!(result.has_recommendations);
    assert_eq!(result.recommendations.len(), 1);
    let record = &result.recommendations[0];
    assert_eq!(record.title, "City Museum");
    assert_eq!(record.category, Category::Attraction);
    assert_eq!(record.rating, Some(4.5));
    assert_eq!(record.duration.as_deref(), Some("2 hours"));
    assert_eq!(record.accessibility, Some(Accessibility::Full));
    assert!(record.validate().is_ok());
}

#[test]
fn test_farewell_has_no_recommendations() {
    let result = extract_recommendations("Have a great trip!", None);
    assert!(!result.has_recommendations);
    assert!(result.recommendations.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, json!({"hasRecommendations": false, "recommendations": []}));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_hint_short_circuits_any_text() {
    let hint = vec![
        json!({"title": "Tsukiji Outer Market", "category": "restaurant", "dietaryOptions": ["vegetarian"]}),
        json!("Meiji Shrine"),
        json!(17),
    ];

    for text in [
        "",
        "Have a great trip!",
        "I recommend the City Museum: rated 4.5 stars.",
    ] {
        let result = extract_recommendations(text, Some(hint.as_slice()));
        assert_eq!(result.recommendations.len(), hint.len());
        assert_eq!(result.recommendations[0].title, "Tsukiji Outer Market");
        assert_eq!(result.recommendations[1].title, "Meiji Shrine");
        assert_eq!(result.recommendations[2].title, "Recommendation 3");
    }
}

#[test]
fn test_segment_without_keywords_is_attraction() {
    let result = extract_recommendations(
        "I recommend Xylo Hall: a wonderful experience with live music.",
        None,
    );
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(result.recommendations[0].category, Category::Attraction);
}

#[test]
fn test_out_of_range_rating_is_rejected() {
    let result = extract_recommendations(
        "I recommend Star Diner: a friendly diner, 9 stars from us, great pancakes.",
        None,
    );
    for record in &result.recommendations {
        assert_ne!(record.rating, Some(9.0));
        assert!(record.rating.map_or(true, |r| (0.0..=5.0).contains(&r)));
    }

    let hinted = extract_recommendations("", Some(&[json!({"title": "Star Diner", "rating": 9})][..]));
    assert_eq!(hinted.recommendations[0].rating, None);
}

// ============================================================================
// Normalizer to extractor
// ============================================================================

#[test]
fn test_structured_reply_feeds_the_extractor() {
    let raw = json!({
        "conversational_response": "A relaxed day in Lisbon for the whole family.",
        "structured_recommendations": [
            {
                "title": "Oceanario de Lisboa",
                "category": "attraction",
                "description": "Huge aquarium with a central tank kids adore",
                "rating": "4.8/5",
                "duration": 2,
                "ageGroup": ["Kids Love", "All Ages"],
                "timeSlot": "morning"
            },
            {
                "title": "Time Out Market",
                "category": "restaurant",
                "description": "Food hall with dozens of stalls and plenty of seating",
                "price": "$$",
                "dietaryOptions": ["Vegetarian", "Vegan"],
                "timeSlot": "evening"
            },
            {
                "title": "Tram 28",
                "category": "transport",
                "description": "Historic tram rattling through Alfama"
            }
        ]
    })
    .to_string();

    let normalized = normalize_response(&raw);
    let result = extract_recommendations(
        &normalized.conversational_response,
        Some(normalized.structured_recommendations.as_slice()),
    );

    assert_eq!(result.recommendations.len(), 3);
    let oceanarium = &result.recommendations[0];
    assert_eq!(oceanarium.rating, Some(4.8));
    assert_eq!(oceanarium.duration.as_deref(), Some("2 hours"));
    assert_eq!(oceanarium.age_group, vec![AgeGroup::KidsLove, AgeGroup::AllAges]);

    let market = &result.recommendations[1];
    assert_eq!(market.price, Some(PriceTier::Moderate));
    assert_eq!(market.dietary_options.as_ref().map(Vec::len), Some(2));

    let day = group_by_time_slot(&result.recommendations);
    assert_eq!(day[0].0, TimeSlot::Morning);
    assert_eq!(day[0].1.len(), 1);
    // Tram 28 has no slot and lands in the afternoon.
    assert_eq!(day[1].1[0].title, "Tram 28");
    assert_eq!(day[2].1[0].title, "Time Out Market");
}

#[test]
fn test_prose_list_after_verbatim_normalization() {
    let reply = "Here are some suggestions for your family in Rome:\n\n\
        1. **Colosseum**: iconic ancient amphitheatre, book a guided tour, about 3 hours.\n\
        2. **Trattoria da Enzo**: cozy restaurant serving Roman classics with vegetarian options.\n\
        3. **Villa Borghese**: a large park where kids can rent bikes.";

    let normalized = normalize_response(reply);
    assert!(!normalized.has_structured());

    let result = extract_recommendations(&normalized.conversational_response, None);
    let titles: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Colosseum", "Trattoria da Enzo", "Villa Borghese"]);
    assert_eq!(result.recommendations[1].category, Category::Restaurant);
    assert!(result
        .recommendations
        .iter()
        .all(|r| r.validate().is_ok()));
}
