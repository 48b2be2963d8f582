//! Itinerary Grouping
//!
//! Groupings of one turn's recommendation records for the category and
//! day-plan views.

use flexitrip_core::{Category, RecommendationRecord, TimeSlot};

/// Slot used for records the model did not place in the day.
pub const DEFAULT_TIME_SLOT: TimeSlot = TimeSlot::Afternoon;

/// Group records by category in category declaration order.
///
/// Categories with no records are omitted; records keep their relative order.
pub fn group_by_category(
    records: &[RecommendationRecord],
) -> Vec<(Category, Vec<&RecommendationRecord>)> {
    Category::ALL
        .iter()
        .map(|category| {
            let members: Vec<&RecommendationRecord> =
                records.iter().filter(|r| r.category == *category).collect();
            (*category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Group records into morning, afternoon and evening.
///
/// Every slot is present, possibly empty, so a day plan always shows all
/// three. Records without a slot land in the afternoon.
pub fn group_by_time_slot(
    records: &[RecommendationRecord],
) -> Vec<(TimeSlot, Vec<&RecommendationRecord>)> {
    TimeSlot::ALL
        .iter()
        .map(|slot| {
            let members = records
                .iter()
                .filter(|r| r.time_slot.unwrap_or(DEFAULT_TIME_SLOT) == *slot)
                .collect();
            (*slot, members)
        })
        .collect()
}
