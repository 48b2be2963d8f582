//! Keyword tables used to classify recommendation segments.
//!
//! Matching is case-insensitive substring search against the lowercased
//! segment. Table order matters where scores tie.

use flexitrip_core::{AgeGroup, Category, DietaryOption, TimeSlot};

pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Attraction,
        &[
            "museum", "park", "monument", "landmark", "attraction", "site", "tower", "bridge",
            "temple", "church", "cathedral", "palace", "castle", "fort", "zoo", "aquarium",
            "garden", "beach", "mountain", "lake", "river", "viewpoint", "observatory", "gallery",
            "exhibition", "memorial", "statue", "plaza", "square",
        ],
    ),
    (
        Category::Restaurant,
        &[
            "restaurant", "cafe", "bistro", "diner", "eatery", "food", "cuisine", "meal",
            "dining", "bar", "pub", "tavern", "grill", "bakery", "market", "street food",
            "lunch", "dinner", "breakfast", "brunch", "snack", "dessert", "coffee",
        ],
    ),
    (
        Category::Transport,
        &[
            "transport", "taxi", "uber", "bus", "train", "metro", "subway", "tram", "ferry",
            "boat", "car", "rental", "walk", "bike", "scooter", "ride", "shuttle", "airport",
            "station", "getting around", "travel",
        ],
    ),
    (
        Category::Accommodation,
        &[
            "hotel", "hostel", "resort", "inn", "lodge", "motel", "bnb", "airbnb",
            "accommodation", "stay", "room", "suite", "apartment", "villa",
        ],
    ),
];

pub const AGE_GROUP_KEYWORDS: &[(AgeGroup, &[&str])] = &[
    (
        AgeGroup::AllAges,
        &["all ages", "family-friendly", "everyone", "suitable for all"],
    ),
    (
        AgeGroup::KidsLove,
        &["kids", "children", "toddler", "interactive", "playground", "fun for kids"],
    ),
    (
        AgeGroup::Adults,
        &["adults", "mature", "sophisticated", "adult-oriented"],
    ),
    (
        AgeGroup::Seniors,
        &["seniors", "elderly", "accessible", "easy walk", "wheelchair"],
    ),
    (
        AgeGroup::Teens,
        &["teens", "teenagers", "youth", "adventure", "exciting"],
    ),
];

pub const DIETARY_KEYWORDS: &[(DietaryOption, &[&str])] = &[
    (DietaryOption::Vegetarian, &["vegetarian", "veggie", "plant-based"]),
    (DietaryOption::Vegan, &["vegan", "plant-only"]),
    (DietaryOption::GlutenFree, &["gluten-free", "celiac", "gluten free"]),
    (DietaryOption::Halal, &["halal", "muslim-friendly"]),
    (DietaryOption::Kosher, &["kosher", "jewish"]),
    (
        DietaryOption::DairyFree,
        &["dairy-free", "lactose-free", "no dairy"],
    ),
];

pub const TIME_SLOT_KEYWORDS: &[(TimeSlot, &[&str])] = &[
    (
        TimeSlot::Morning,
        &["morning", "breakfast", "sunrise", "early start", "before noon"],
    ),
    (
        TimeSlot::Afternoon,
        &["afternoon", "lunch", "midday", "noon"],
    ),
    (
        TimeSlot::Evening,
        &["evening", "dinner", "sunset", "night", "nightlife"],
    ),
];

/// Phrases that mark a reply as containing recommendations at all.
pub const RECOMMENDATION_INDICATORS: &[&str] = &[
    "recommend",
    "suggest",
    "try",
    "visit",
    "check out",
    "consider",
    "great place",
    "perfect for",
    "ideal for",
    "must-see",
    "don't miss",
    "restaurant",
    "hotel",
    "attraction",
    "activity",
];

pub const FREE_CUES: &[&str] = &["free", "no cost", "complimentary"];
pub const EXPENSIVE_CUES: &[&str] = &["expensive", "pricey", "costly"];
pub const BUDGET_CUES: &[&str] = &["cheap", "inexpensive", "affordable", "budget"];
pub const MODERATE_CUES: &[&str] = &["moderate", "reasonable"];

/// Checked before the positive cues so "not fully accessible" is not read as full.
pub const LIMITED_ACCESS_CUES: &[&str] = &[
    "not fully accessible",
    "partially accessible",
    "partially wheelchair",
    "limited access",
    "limited accessibility",
];
pub const NO_ACCESS_CUES: &[&str] = &[
    "not accessible",
    "not wheelchair",
    "inaccessible",
    "stairs only",
];
pub const FULL_ACCESS_CUES: &[&str] = &[
    "wheelchair accessible",
    "wheelchair-accessible",
    "wheelchair friendly",
    "wheelchair-friendly",
    "fully accessible",
    "step-free",
];

/// Leading words that make a candidate title a sentence fragment.
pub const TITLE_STOPWORDS: &[&str] = &[
    // articles and determiners
    "a", "an", "this", "that", "these", "those", "some", "any", "each", "every", "many",
    "most", "more", "several", "both", "all", "another", "such",
    // prepositions and conjunctions
    "in", "on", "at", "to", "for", "from", "with", "by", "of", "near", "about", "after",
    "before", "during", "into", "around", "and", "or", "but", "so", "while", "when",
    "where", "which", "because", "since", "if", "then", "than", "as",
    // pronouns
    "i", "we", "you", "he", "she", "it", "they", "my", "our", "your", "their", "its", "his",
    "her", "me", "us", "them",
    // conversational openers
    "let", "let's", "feel", "hope", "please", "also", "however", "here", "there", "just",
    "enjoy", "remember", "don't", "make", "be", "sure", "whether", "overall",
    "finally", "first", "next", "lastly", "additionally", "plus", "note", "tip", "consider",
    "would", "could", "should", "can", "will", "may", "might", "what", "how", "why",
];

/// Verbs that turn a candidate title into a clause.
pub const LINKING_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "has", "have", "had", "offers",
    "provides", "features", "includes", "seems", "looks", "becomes", "will", "can", "would",
    "should",
];

/// Generic phrases models use as headings that are not places.
pub const TITLE_DENY_LIST: &[&str] = &[
    "strip views",
    "organized by type",
    "here are",
    "here is",
    "recommendations",
    "things to do",
    "places to visit",
    "top picks",
    "getting there",
    "local tips",
    "pro tip",
    "summary",
    "overview",
    "itinerary",
    "day 1",
    "day 2",
    "day 3",
];
