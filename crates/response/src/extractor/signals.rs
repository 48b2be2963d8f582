//! Per-segment signal extractors.
//!
//! Each extractor is a pure function over the segment text. They never look
//! at each other's output; the only cross-signal rule (dietary options only
//! for restaurants) lives in the caller.

use regex::Regex;
use std::sync::OnceLock;

use flexitrip_core::{Accessibility, AgeGroup, Category, DietaryOption, PriceTier, TimeSlot};

use super::keywords::{
    AGE_GROUP_KEYWORDS, BUDGET_CUES, CATEGORY_KEYWORDS, DIETARY_KEYWORDS, EXPENSIVE_CUES,
    FREE_CUES, FULL_ACCESS_CUES, LIMITED_ACCESS_CUES, MODERATE_CUES, NO_ACCESS_CUES,
    TIME_SLOT_KEYWORDS,
};

/// Score each category by the number of its keywords present in the text.
///
/// Ties go to the earlier category; no hits at all means `Attraction`.
pub fn detect_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    let mut best = Category::default();
    let mut best_score = 0;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords.iter().filter(|k| lower.contains(*k)).count();
        if score > best_score {
            best = *category;
            best_score = score;
        }
    }
    best
}

/// Age groups whose keywords appear in the text, `[All Ages]` when none do.
pub fn detect_age_groups(text: &str) -> Vec<AgeGroup> {
    let lower = text.to_lowercase();
    let groups: Vec<AgeGroup> = AGE_GROUP_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(group, _)| *group)
        .collect();

    if groups.is_empty() {
        vec![AgeGroup::AllAges]
    } else {
        groups
    }
}

pub fn detect_dietary_options(text: &str) -> Vec<DietaryOption> {
    let lower = text.to_lowercase();
    DIETARY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(option, _)| *option)
        .collect()
}

fn rating_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)(\d+(?:\.\d+)?)[\s-]*(?:stars?\b|/\s*5\b|rating\b)",
            r"(?i)\brated?\s+(?:at\s+)?(\d+(?:\.\d+)?)",
            r"(?i)(\d+(?:\.\d+)?)\s*out\s+of\s+5\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid rating pattern"))
        .collect()
    })
}

/// First rating inside `[0, 5]`, trying the patterns in order.
pub fn extract_rating(text: &str) -> Option<f64> {
    rating_patterns().iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .find(|rating| (0.0..=5.0).contains(rating))
    })
}

fn duration_patterns() -> &'static [(Regex, &'static str, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let quantity = r"(\d+(?:\.\d+)?)(?:\s*(?:-|–|to)\s*(\d+(?:\.\d+)?))?\s*";
        [
            (r"(?:hours?|hrs?|h)\b", "hour", "hours"),
            (r"(?:minutes?|mins?)\b", "minute", "minutes"),
            (r"days?\b", "day", "days"),
        ]
        .iter()
        .map(|(unit, singular, plural)| {
            let pattern = format!(r"(?i)\b{}{}", quantity, unit);
            (
                Regex::new(&pattern).expect("valid duration pattern"),
                *singular,
                *plural,
            )
        })
        .collect()
    })
}

pub(crate) fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Duration such as "2 hours", "1 day" or "2-3 hours". Hours win over
/// minutes, minutes over days.
pub fn extract_duration(text: &str) -> Option<String> {
    duration_patterns()
        .iter()
        .find_map(|(pattern, singular, plural)| {
            let caps = pattern.captures(text)?;
            let low: f64 = caps.get(1)?.as_str().parse().ok()?;
            match caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) {
                Some(high) => Some(format!(
                    "{}-{} {}",
                    format_quantity(low),
                    format_quantity(high),
                    plural
                )),
                None if low == 1.0 => Some(format!("1 {}", singular)),
                None => Some(format!("{} {}", format_quantity(low), plural)),
            }
        })
}

/// Byte offsets of whole-word occurrences of `needle` in `haystack`.
fn word_matches<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(needle).filter_map(move |(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        let bounded = !before.is_some_and(char::is_alphanumeric)
            && !after.is_some_and(char::is_alphanumeric);
        bounded.then_some(i)
    })
}

pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    word_matches(haystack, needle).next().is_some()
}

/// "free" as a price cue, not as the tail of a compound like "gluten-free".
fn mentions_free(lower: &str) -> bool {
    FREE_CUES.iter().any(|cue| {
        word_matches(lower, cue).any(|i| {
            let before = lower[..i].chars().next_back();
            let after = lower[i + cue.len()..].chars().next();
            before != Some('-') && after != Some('-')
        })
    })
}

/// Price tier from wording cues, then from the count of `$` signs.
pub fn extract_price(text: &str) -> Option<PriceTier> {
    let lower = text.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| contains_word(&lower, cue));

    if mentions_free(&lower) {
        Some(PriceTier::Free)
    } else if has_any(EXPENSIVE_CUES) {
        Some(PriceTier::Expensive)
    } else if has_any(BUDGET_CUES) {
        Some(PriceTier::Budget)
    } else if has_any(MODERATE_CUES) {
        Some(PriceTier::Moderate)
    } else {
        PriceTier::from_dollar_count(text.matches('$').count())
    }
}

pub fn extract_accessibility(text: &str) -> Option<Accessibility> {
    let lower = text.to_lowercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| lower.contains(cue));

    if has_any(LIMITED_ACCESS_CUES) {
        Some(Accessibility::Limited)
    } else if has_any(NO_ACCESS_CUES) {
        Some(Accessibility::None)
    } else if has_any(FULL_ACCESS_CUES) {
        Some(Accessibility::Full)
    } else {
        None
    }
}

/// Time slot whose cue appears earliest in the text.
pub fn detect_time_slot(text: &str) -> Option<TimeSlot> {
    let lower = text.to_lowercase();
    TIME_SLOT_KEYWORDS
        .iter()
        .filter_map(|(slot, keywords)| {
            keywords
                .iter()
                .filter_map(|k| word_matches(&lower, k).next())
                .min()
                .map(|pos| (pos, *slot))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, slot)| slot)
}

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\b(?i:located|situated|nestled|set)\s+(?i:in|on|at|near|inside|along)\s+(?:the\s+)?([A-Z][\w'’.-]*(?:\s+(?:[A-Z][\w'’.-]*|de|del|la|le|of|the|di|da))*)",
        )
        .expect("valid location pattern")
    })
}

/// Place name after a cue such as "located in" or "situated near".
pub fn extract_location(text: &str) -> Option<String> {
    let caps = location_pattern().captures(text)?;
    let mut words: Vec<&str> = caps.get(1)?.as_str().split_whitespace().collect();
    while words
        .last()
        .is_some_and(|w| w.chars().next().is_some_and(char::is_lowercase))
    {
        words.pop();
    }
    let location = words.join(" ");
    let location = location.trim_end_matches(['.', ',']);
    (!location.is_empty()).then(|| location.to_string())
}
