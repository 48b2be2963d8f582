//! Title extraction for a single segment.
//!
//! A segment is first stripped of a recommendation lead-in ("I recommend the",
//! "Try", ...). Candidate titles are then taken from four shapes, in order:
//!
//! - text before a colon or spaced dash: `Louvre Museum: ...`
//! - text before a copular verb: `The Louvre is ...`
//! - a capitalized clause ending in a period: `Sainte-Chapelle. Its windows ...`
//! - a run of capitalized words followed by a new sentence: `Pont Neuf Walk across ...`
//!
//! The first candidate inside the length band that is not disqualified wins.

use regex::Regex;
use std::sync::OnceLock;

use super::keywords::{LINKING_VERBS, TITLE_DENY_LIST, TITLE_STOPWORDS};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MAX_TITLE_CHARS: usize = 80;
const MAX_FALLBACK_WORDS: usize = 8;
const MIN_FALLBACK_CHARS: usize = 3;

/// Title and description split out of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSplit {
    pub title: String,
    pub description: String,
}

/// Why a segment produced no title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRejection {
    /// Every in-band candidate looked like a sentence fragment
    Disqualified(String),
    /// Nothing usable at all
    Empty,
}

fn lead_in_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:i|we)(?:'d|\s+would)?\s+(?:also\s+|highly\s+|strongly\s+|really\s+)?(?:recommend|suggest)(?:ing)?|(?:you\s+(?:should|could|might|must|can)\s+)?(?:definitely\s+|also\s+)?(?:try|visit|check\s+out|consider|explore|stop\s+by|head\s+to|don't\s+miss)|(?:my\s+)?(?:top\s+)?(?:recommendation|suggestion|pick)\s+(?:is|would\s+be))[:,]?\s+(?:(?:visiting|trying|exploring|checking\s+out|going\s+to|a\s+visit\s+to|a\s+trip\s+to)\s+)?",
        )
        .expect("valid lead-in pattern")
    })
}

fn copular_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([^.!?]+?)\s+(?:is|are|offers|provides|features)\b")
            .expect("valid copular pattern")
    })
}

fn clause_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Z][^.!?:]*)[.!?](?:\s|$)").expect("valid clause pattern")
    })
}

/// Remove a recommendation lead-in and a lowercase article after it.
pub fn strip_lead_in(segment: &str) -> &str {
    let rest = match lead_in_pattern().find(segment) {
        Some(m) => &segment[m.end()..],
        None => segment,
    };
    rest.strip_prefix("the ").unwrap_or(rest).trim_start()
}

fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '*' | '_' | '`'))
        .trim_end_matches(|c: char| c.is_ascii_punctuation() && c != ')')
        .trim()
        .to_string()
}

fn in_band(title: &str) -> bool {
    (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&title.chars().count())
}

fn normalized_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
}

/// True when a candidate title reads like a sentence fragment rather than a
/// place name.
pub fn is_disqualified(title: &str) -> bool {
    let words: Vec<&str> = title.split_whitespace().collect();
    let Some(first) = words.first() else {
        return true;
    };
    let first_lower = normalized_word(first);

    // "here's", "you'll", "we're", "i'd"
    let contraction_base = first_lower.split('\'').next().unwrap_or_default();
    let is_contraction = first_lower.contains('\'') && TITLE_STOPWORDS.contains(&contraction_base);
    if TITLE_STOPWORDS.contains(&first_lower.as_str()) || is_contraction {
        return true;
    }

    if first_lower == "the" {
        let next_is_capitalized = words
            .get(1)
            .and_then(|w| w.chars().next())
            .is_some_and(|c| c.is_uppercase());
        if !next_is_capitalized {
            return true;
        }
    }

    if words[1..]
        .iter()
        .any(|w| LINKING_VERBS.contains(&normalized_word(w).as_str()))
    {
        return true;
    }

    let lower = title.to_lowercase();
    if TITLE_DENY_LIST.iter().any(|phrase| lower.contains(phrase)) {
        return true;
    }

    !title.chars().any(char::is_uppercase)
}

/// Candidate title and the text that follows it.
type Candidate = (String, String);

fn split_at_separator(body: &str) -> Option<Candidate> {
    let colon = body.find(':').map(|i| (i, 1));
    let dash = [" - ", " – ", " — "]
        .iter()
        .filter_map(|sep| body.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|(i, _)| *i);

    let (at, len) = match (colon, dash) {
        (Some(c), Some(d)) => {
            if c.0 <= d.0 {
                c
            } else {
                d
            }
        }
        (Some(c), None) => c,
        (None, Some(d)) => d,
        (None, None) => return None,
    };
    Some((body[..at].to_string(), body[at + len..].to_string()))
}

fn split_at_copula(body: &str) -> Option<Candidate> {
    let caps = copular_pattern().captures(body)?;
    let title = caps.get(1)?;
    Some((title.as_str().to_string(), body[title.end()..].to_string()))
}

fn split_at_clause(body: &str) -> Option<Candidate> {
    let caps = clause_pattern().captures(body)?;
    let whole = caps.get(0)?;
    Some((caps.get(1)?.as_str().to_string(), body[whole.end()..].to_string()))
}

const NAME_CONNECTORS: &[&str] = &["of", "de", "du", "del", "la", "le", "di", "da", "the", "and", "&"];

/// `Pont Neuf Walk across the river` -> (`Pont Neuf`, `Walk across the river`).
fn split_at_sentence_start(body: &str) -> Option<Candidate> {
    let words: Vec<&str> = body.split_whitespace().collect();
    let mut run = 0;
    while run < words.len() {
        let word = words[run];
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        let connector = run > 0 && NAME_CONNECTORS.contains(&word);
        if !(capitalized || connector) {
            break;
        }
        run += 1;
    }

    // Need a name of at least one word, the capitalized sentence opener, and
    // a lowercase continuation of that sentence.
    if run < 2 || run >= words.len() {
        return None;
    }
    let opener = words[run - 1];
    if !opener.chars().next().is_some_and(char::is_uppercase) {
        return None;
    }
    let title = words[..run - 1].join(" ");
    let description = words[run - 1..].join(" ");
    Some((title, description))
}

/// Extract a title from one segment.
pub fn extract_title(segment: &str) -> Result<TitleSplit, TitleRejection> {
    let body = strip_lead_in(segment);
    if body.is_empty() {
        return Err(TitleRejection::Empty);
    }

    let candidates = [
        split_at_separator(body),
        split_at_copula(body),
        split_at_clause(body),
        split_at_sentence_start(body),
    ];

    let mut rejected: Option<String> = None;
    for (raw_title, rest) in candidates.into_iter().flatten() {
        let title = clean_title(&raw_title);
        if !in_band(&title) {
            continue;
        }
        if is_disqualified(&title) {
            rejected.get_or_insert(title);
            continue;
        }
        return Ok(TitleSplit {
            title,
            description: rest,
        });
    }

    if let Some(title) = rejected {
        return Err(TitleRejection::Disqualified(title));
    }

    fallback_title(body).map(|title| TitleSplit {
        title,
        description: segment.to_string(),
    })
}

/// Leading `min(8, words / 3)` words, at least one.
fn fallback_title(body: &str) -> Result<String, TitleRejection> {
    let words: Vec<&str> = body.split_whitespace().collect();
    let take = (words.len() / 3).min(MAX_FALLBACK_WORDS).max(1);
    let title = clean_title(&words.iter().take(take).copied().collect::<Vec<_>>().join(" "));

    if title.chars().count() < MIN_FALLBACK_CHARS {
        return Err(TitleRejection::Empty);
    }
    if is_disqualified(&title) {
        return Err(TitleRejection::Disqualified(title));
    }
    Ok(title)
}
