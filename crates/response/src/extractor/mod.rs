//! Recommendation Extractor
//!
//! Turns an assistant reply into recommendation records. A non-empty
//! structured hint from the model is mapped one-to-one; otherwise the prose is
//! split into segments and each segment is mined with keyword and regex
//! heuristics. Extraction is best-effort: the signals are hints, not facts.

pub mod hint;
pub mod keywords;
pub mod segment;
pub mod signals;
pub mod title;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flexitrip_core::{Category, RecommendationRecord, MAX_DESCRIPTION_CHARS};

use self::keywords::RECOMMENDATION_INDICATORS;
use self::title::TitleRejection;

/// Descriptions shorter than this fall back to the title.
const MIN_DESCRIPTION_CHARS: usize = 10;
const ELLIPSIS: &str = "...";

/// Records extracted from one assistant reply, in relevance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub has_recommendations: bool,
    pub recommendations: Vec<RecommendationRecord>,
}

impl ExtractionResult {
    fn from_records(recommendations: Vec<RecommendationRecord>) -> Self {
        Self {
            has_recommendations: !recommendations.is_empty(),
            recommendations,
        }
    }
}

/// True when the text mentions anything that looks like a recommendation.
pub fn has_recommendation_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    RECOMMENDATION_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
}

/// Strip leading punctuation, cap at the display length, and fall back to
/// the title when nothing meaningful is left.
pub(crate) fn clean_description(raw: &str, title: &str) -> String {
    let trimmed = raw
        .trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .trim();
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() < MIN_DESCRIPTION_CHARS {
        return title.to_string();
    }
    if collapsed.chars().count() > MAX_DESCRIPTION_CHARS {
        let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
        let mut truncated: String = collapsed.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        return truncated;
    }
    collapsed
}

fn record_from_segment(id: String, segment: &str) -> Option<RecommendationRecord> {
    let split = match title::extract_title(segment) {
        Ok(split) => split,
        Err(TitleRejection::Disqualified(candidate)) => {
            tracing::debug!(title = %candidate, "Rejected segment with fragment title");
            return None;
        }
        Err(TitleRejection::Empty) => return None,
    };

    let category = signals::detect_category(segment);
    let mut record = RecommendationRecord::new(
        id,
        split.title.clone(),
        category,
        clean_description(&split.description, &split.title),
    );

    record.age_group = signals::detect_age_groups(segment);
    record.rating = signals::extract_rating(segment);
    record.duration = signals::extract_duration(segment);
    record.price = signals::extract_price(segment);
    record.accessibility = signals::extract_accessibility(segment);
    record.location = signals::extract_location(segment);
    record.time_slot = signals::detect_time_slot(segment);
    if category == Category::Restaurant {
        record.dietary_options = Some(signals::detect_dietary_options(segment));
    }

    Some(record)
}

/// Extract recommendation records from an assistant reply.
///
/// A non-empty `structured_hint` wins outright and `text` is not read.
pub fn extract_recommendations(text: &str, structured_hint: Option<&[Value]>) -> ExtractionResult {
    if let Some(entries) = structured_hint.filter(|h| !h.is_empty()) {
        tracing::debug!(count = entries.len(), "Mapping structured recommendations");
        return ExtractionResult::from_records(hint::records_from_hint(entries));
    }

    if !has_recommendation_indicator(text) {
        return ExtractionResult::default();
    }

    let segments = segment::split_segments(text);
    let mut records = Vec::new();
    for segment in &segments {
        if let Some(record) = record_from_segment(format!("rec_{}", records.len()), segment) {
            records.push(record);
        }
    }

    tracing::debug!(
        segments = segments.len(),
        records = records.len(),
        "Extracted recommendations from prose"
    );
    ExtractionResult::from_records(records)
}
