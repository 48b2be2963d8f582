//! Prompt Integration Tests
//!
//! System prompt assembly and the quick-start question generator for a
//! realistic multi-generational group.

use flexitrip::models::traveler::{CulturalSettings, Mobility, TravelPreferences, Traveler};
use flexitrip::services::prompt::{build_system_prompt, RESPONSE_CONTRACT};
use flexitrip::services::prompt_generator::{
    generate_base_prompt, generate_quick_prompts, has_valid_selections, FocusType,
    PromptGeneratorOptions,
};

fn family() -> Vec<Traveler> {
    vec![
        Traveler::new("session-1", "Priya", 38)
            .with_cultural_background("Indian")
            .with_dietary_restrictions(vec!["vegetarian".to_string()]),
        Traveler::new("session-1", "Arjun", 7).with_interests(vec!["dinosaurs".to_string()]),
        Traveler::new("session-1", "Kamala", 72)
            .with_mobility(Mobility::Low)
            .with_cultural_background("Indian")
            .with_dietary_restrictions(vec!["vegetarian".to_string()]),
    ]
}

#[test]
fn test_system_prompt_for_family() {
    let prompt = build_system_prompt(&family(), Some("Destination: London, 3 nights"));

    assert!(prompt.contains("\"name\": \"Priya\""));
    assert!(prompt.contains("- Arjun (7): Enjoys interactive activities"));
    assert!(prompt.contains("- Kamala (72): Mobility level: low"));
    // Shared background and restriction are listed once.
    assert!(prompt.contains("Cultural backgrounds: Indian\n"));
    assert!(prompt.contains("Dietary restrictions: vegetarian\n"));
    assert!(prompt.contains(RESPONSE_CONTRACT));
    assert!(prompt.contains("CURRENT TRAVEL CONTEXT:\nDestination: London, 3 nights\n\n"));
}

#[test]
fn test_system_prompt_without_context() {
    let prompt = build_system_prompt(&family(), Some("   "));
    assert!(!prompt.contains("CURRENT TRAVEL CONTEXT"));
    assert_eq!(prompt, build_system_prompt(&family(), None));
}

#[test]
fn test_generated_questions_for_family() {
    let options = PromptGeneratorOptions {
        travelers: family(),
        travel_preferences: TravelPreferences {
            destination: "London".to_string(),
            check_in: "2025-07-04".to_string(),
            check_out: "2025-07-07".to_string(),
            budget: "Moderate".to_string(),
            ..Default::default()
        },
        cultural_settings: CulturalSettings {
            cultural_background: vec!["indian".to_string()],
            dietary_restrictions: vec!["vegetarian".to_string()],
            ..Default::default()
        },
        focus_type: FocusType::General,
    };
    assert!(has_valid_selections(&options));

    let base = generate_base_prompt(&options);
    assert!(base.starts_with(
        "I'm planning a trip to London for 1 adult, 1 child, and 1 senior from 7/4/2025 to 7/7/2025 with a moderate budget"
    ));
    assert!(base.contains("vegetarian-friendly dining"));

    let quick = generate_quick_prompts(&options);
    assert_eq!(quick.len(), 3);
    assert_eq!(quick[0], base);
    assert!(quick.iter().all(|q| q.starts_with("I'm planning a trip to London")));
}

#[test]
fn test_nothing_selected() {
    let options = PromptGeneratorOptions::default();
    assert!(!has_valid_selections(&options));
    assert!(generate_base_prompt(&options).starts_with("I'm planning a family trip"));
}
