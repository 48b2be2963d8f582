//! Mapping structured recommendation objects sent by the model.
//!
//! The model is asked for the record shape directly, but field names drift
//! (`time_slot` vs `timeSlot`), numbers arrive as strings and labels arrive in
//! any case. Every entry maps to exactly one record; unusable fields are
//! dropped rather than failing the entry.

use serde_json::{Map, Value};

use flexitrip_core::{
    Accessibility, AgeGroup, Category, DietaryOption, PriceTier, RecommendationRecord, TimeSlot,
};

use super::clean_description;
use super::signals::{detect_category, format_quantity};

fn field<'a>(map: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| map.get(*name).filter(|v| !v.is_null()))
}

fn string_field(map: &Map<String, Value>, names: &[&str]) -> Option<String> {
    match field(map, names)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn labels(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(s)) => s.split(',').map(str::trim).collect(),
        _ => Vec::new(),
    }
}

/// Parse each label, keeping the first occurrence of every value.
fn parse_label_set<T: std::str::FromStr + PartialEq>(value: Option<&Value>) -> Vec<T> {
    let mut set = Vec::new();
    for parsed in labels(value).into_iter().filter_map(|label| label.parse::<T>().ok()) {
        if !set.contains(&parsed) {
            set.push(parsed);
        }
    }
    set
}

fn parse_rating(value: Option<&Value>) -> Option<f64> {
    let rating = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches("/5").trim().parse().ok()?,
        _ => return None,
    };
    (0.0..=5.0).contains(&rating).then_some(rating)
}

fn parse_duration(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_f64().map(|hours| {
            if hours == 1.0 {
                "1 hour".to_string()
            } else {
                format!("{} hours", format_quantity(hours))
            }
        }),
        _ => None,
    }
}

/// Map one hint entry to a record. `index` is zero-based.
pub fn record_from_hint(index: usize, entry: &Value) -> RecommendationRecord {
    let id = format!("rec_{}", index);
    let placeholder = || format!("Recommendation {}", index + 1);

    let map = match entry {
        Value::Object(map) => map,
        Value::String(s) if !s.trim().is_empty() => {
            let title = s.trim().to_string();
            let category = detect_category(&title);
            return RecommendationRecord::new(id, title.clone(), category, title);
        }
        _ => {
            let title = placeholder();
            return RecommendationRecord::new(id, title.clone(), Category::default(), title);
        }
    };

    let title = string_field(map, &["title", "name"]).unwrap_or_else(placeholder);
    let raw_description = string_field(map, &["description", "summary"]).unwrap_or_default();

    let category = string_field(map, &["category", "type"])
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or_else(|| detect_category(&format!("{} {}", title, raw_description)));

    let mut record = RecommendationRecord::new(
        id,
        title.clone(),
        category,
        clean_description(&raw_description, &title),
    );

    record.rating = parse_rating(field(map, &["rating", "stars"]));
    record.duration = parse_duration(field(map, &["duration"]));
    record.price = string_field(map, &["price", "price_range", "priceRange"])
        .and_then(|p| p.parse::<PriceTier>().ok());
    record.accessibility =
        string_field(map, &["accessibility"]).and_then(|a| a.parse::<Accessibility>().ok());
    record.location = string_field(map, &["location", "address", "area"]);
    record.time_slot =
        string_field(map, &["timeSlot", "time_slot"]).and_then(|t| t.parse::<TimeSlot>().ok());

    let age_groups: Vec<AgeGroup> =
        parse_label_set(field(map, &["ageGroup", "age_group", "ageGroups"]));
    if !age_groups.is_empty() {
        record.age_group = age_groups;
    }

    if category == Category::Restaurant {
        let dietary = field(map, &["dietaryOptions", "dietary_options", "dietary"]);
        if dietary.is_some() {
            record.dietary_options = Some(parse_label_set::<DietaryOption>(dietary));
        }
    }

    record
}

/// Map every hint entry, in order.
pub fn records_from_hint(hint: &[Value]) -> Vec<RecommendationRecord> {
    hint.iter()
        .enumerate()
        .map(|(i, entry)| record_from_hint(i, entry))
        .collect()
}
