//! Splitting prose into candidate recommendation segments.

use regex::Regex;
use std::sync::OnceLock;

/// Segments shorter than this (in characters) cannot hold a recommendation.
pub const MIN_SEGMENT_CHARS: usize = 20;

fn list_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+").expect("valid list marker pattern")
    })
}

fn heading_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*#{1,6}\s+").expect("valid heading pattern"))
}

/// Split text on list markers, bullets and blank lines.
///
/// Lines that do not start a new item are folded into the current segment,
/// so a numbered item wrapped over several lines stays one segment. Markdown
/// headings end the current segment and are dropped. Markers and emphasis
/// are removed; short segments are dropped.
pub fn split_segments(text: &str) -> Vec<String> {
    let mut raw_segments: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        if !current.trim().is_empty() {
            raw_segments.push(std::mem::take(current));
        }
        current.clear();
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current);
            continue;
        }

        // Headings label sections; they are never recommendations themselves.
        if heading_marker().is_match(line) {
            flush(&mut current);
            continue;
        }

        let (starts_item, rest) = match list_marker().find(line) {
            Some(m) => (true, &line[m.end()..]),
            None => (false, line),
        };

        if starts_item {
            flush(&mut current);
        } else if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(rest.trim());
    }
    flush(&mut current);

    raw_segments
        .iter()
        .flat_map(|segment| segment.split('•'))
        .map(clean_segment)
        .filter(|segment| segment.chars().count() >= MIN_SEGMENT_CHARS)
        .collect()
}

/// Remove markdown emphasis and leftover marker characters.
pub fn clean_segment(segment: &str) -> String {
    let stripped = segment.replace("**", "").replace("__", "");
    let stripped = list_marker().replace(&stripped, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_list() {
        let text = "Here are some picks:\n\n1. **Louvre Museum**: world-famous art collection.\n2) Musée d'Orsay: impressionist masterpieces in a station.";
        let segments = split_segments(text);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], "Louvre Museum: world-famous art collection.");
        assert!(segments[2].starts_with("Musée d'Orsay:"));
    }

    #[test]
    fn test_wrapped_item_stays_together() {
        let text = "- Jardin du Luxembourg: a classic park\n  with pony rides and a playground.";
        let segments = split_segments(text);
        assert_eq!(
            segments,
            vec!["Jardin du Luxembourg: a classic park with pony rides and a playground."]
        );
    }

    #[test]
    fn test_inline_bullets_split() {
        let text = "Top spots • Sainte-Chapelle: stunning stained glass • Pont Neuf: the oldest bridge in Paris";
        let segments = split_segments(text);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].starts_with("Sainte-Chapelle"));
    }

    #[test]
    fn test_short_segments_dropped() {
        let text = "* Short one\n* Another tiny\n* This one is long enough to keep around";
        let segments = split_segments(text);
        assert_eq!(segments, vec!["This one is long enough to keep around"]);
    }

    #[test]
    fn test_bold_line_is_not_a_bullet() {
        let text = "**Eiffel Tower** - iconic views over the whole city";
        assert_eq!(
            split_segments(text),
            vec!["Eiffel Tower - iconic views over the whole city"]
        );
    }

    #[test]
    fn test_headings_dropped() {
        let text = "### Morning plans for the family\nThe Louvre opens at nine o'clock sharp.";
        let segments = split_segments(text);
        assert_eq!(segments, vec!["The Louvre opens at nine o'clock sharp."]);
    }
}
