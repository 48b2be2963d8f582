//! Response Normalizer Integration Tests
//!
//! Recovery of the `{conversational_response, structured_recommendations}`
//! contract from well-formed, truncated and malformed completions.

use flexitrip_response::{
    normalize_response, normalize_with_tier, NormalizedResponse, RecoveryTier, GENERIC_RESPONSE,
};
use serde_json::json;

use super::init_tracing;

const RIVERSIDE: &str =
    r#"{"conversational_response": "Try the riverside walk.", "structured_recommendations": []}"#;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_well_formed_reply_parses_exactly() {
    init_tracing();
    let expected: NormalizedResponse = serde_json::from_str(RIVERSIDE).unwrap();

    let (response, tier) = normalize_with_tier(RIVERSIDE);
    assert_eq!(tier, RecoveryTier::DirectParse);
    assert_eq!(response, expected);
    assert_eq!(response.conversational_response, "Try the riverside walk.");
}

#[test]
fn test_missing_final_brace_is_repaired() {
    init_tracing();
    let truncated = RIVERSIDE.strip_suffix('}').unwrap();

    let (response, tier) = normalize_with_tier(truncated);
    assert_eq!(tier, RecoveryTier::TruncationRepair);
    assert_eq!(response.conversational_response, "Try the riverside walk.");
    assert!(response.structured_recommendations.is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_totality_on_hostile_inputs() {
    init_tracing();
    let inputs = [
        "",
        "   \n\t ",
        "{",
        "}}}{{{",
        "[1, 2",
        r#"{"conversational_response": "#,
        r#"{"conversational_response": ""}"#,
        "null",
        "42",
        r#""""#,
        "\\",
        "{\"a\": \"\\",
        "Some prose { with a stray brace",
    ];

    for input in inputs {
        let response = normalize_response(input);
        assert!(
            !response.conversational_response.trim().is_empty(),
            "empty text for input {:?}",
            input
        );
    }
}

#[test]
fn test_blank_input_yields_generic_response() {
    assert_eq!(normalize_response("").conversational_response, GENERIC_RESPONSE);
    assert_eq!(normalize_response("  \n").conversational_response, GENERIC_RESPONSE);
}

#[test]
fn test_round_trip_on_well_formed_objects() {
    let originals = vec![
        NormalizedResponse::text("Pack sunscreen."),
        NormalizedResponse {
            conversational_response: "Two ideas for rainy days.\nBoth are indoors.".to_string(),
            structured_recommendations: vec![
                json!({"title": "Aquarium", "category": "attraction", "rating": 4.6}),
                json!({"title": "Noodle Bar", "category": "restaurant", "price": "$"}),
            ],
        },
    ];

    for original in originals {
        let raw = serde_json::to_string(&original).unwrap();
        assert_eq!(normalize_response(&raw), original);
    }
}

#[test]
fn test_truncation_after_text_field_recovers_text() {
    init_tracing();
    let full = json!({
        "conversational_response": "Here are three \"must see\" spots for the kids.",
        "structured_recommendations": [
            {"title": "Science Museum", "category": "attraction", "rating": 4.7},
            {"title": "Harbour Cruise", "category": "activity", "duration": "1 hour"}
        ]
    })
    .to_string();

    let field_end = {
        let value_start = full.find("Here are three").unwrap();
        let closing = full[value_start..].find("kids.\"").unwrap() + "kids.\"".len();
        value_start + closing
    };

    for cut in field_end..full.len() {
        if !full.is_char_boundary(cut) {
            continue;
        }
        let response = normalize_response(&full[..cut]);
        assert_eq!(
            response.conversational_response,
            "Here are three \"must see\" spots for the kids.",
            "cut at {}: {:?}",
            cut,
            &full[..cut]
        );
    }
}

#[test]
fn test_non_array_recommendations_coerced() {
    for value in [json!(null), json!(7), json!("Louvre"), json!({"title": "Louvre"})] {
        let raw = json!({
            "conversational_response": "Enjoy Paris.",
            "structured_recommendations": value,
        })
        .to_string();
        let response = normalize_response(&raw);
        assert_eq!(response.conversational_response, "Enjoy Paris.");
        assert!(response.structured_recommendations.is_empty());
    }
}

// ============================================================================
// Recovery tiers
// ============================================================================

#[test]
fn test_object_inside_prose_is_repaired() {
    let raw = format!("Sure! Here is the plan:\n```json\n{}\n```", RIVERSIDE);
    let (response, tier) = normalize_with_tier(&raw);
    assert_eq!(tier, RecoveryTier::TruncationRepair);
    assert_eq!(response.conversational_response, "Try the riverside walk.");
}

#[test]
fn test_cut_inside_text_field_keeps_partial_text() {
    let raw = r#"{"conversational_response": "Start early at the market and then"#;
    let (response, tier) = normalize_with_tier(raw);
    assert_ne!(tier, RecoveryTier::Verbatim);
    assert!(response
        .conversational_response
        .starts_with("Start early at the market"));
}

#[test]
fn test_cut_inside_next_recommendation_drops_it() {
    let complete = r#"{"conversational_response": "Two picks.", "structured_recommendations": [{"title": "Louvre", "category": "attraction"}, {"#;
    for raw in [format!("{}\"ti", complete), complete.to_string()] {
        let (response, tier) = normalize_with_tier(&raw);
        assert_eq!(tier, RecoveryTier::TruncationRepair);
        assert_eq!(response.conversational_response, "Two picks.");
        assert_eq!(response.structured_recommendations.len(), 1);
        assert_eq!(response.structured_recommendations[0]["title"], "Louvre");
    }
}

#[test]
fn test_prose_is_used_verbatim() {
    let (response, tier) = normalize_with_tier("  Have a lovely trip to Kyoto!  ");
    assert_eq!(tier, RecoveryTier::Verbatim);
    assert_eq!(response.conversational_response, "Have a lovely trip to Kyoto!");
    assert!(!response.has_structured());
}
