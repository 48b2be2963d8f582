//! JSON Repair
//!
//! Recovers a parseable JSON object from text that contains one, possibly
//! wrapped in prose or cut short by an upstream token limit.

/// Outcome of scanning a candidate from its first `{`.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Depth returned to zero; the object ends at this byte offset (exclusive).
    Balanced(usize),
    /// Input ended with containers still open.
    Truncated {
        /// Opening delimiters still open, outermost first
        open: Vec<u8>,
        /// Byte offset of the opening quote of an unterminated string
        dangling_string: Option<usize>,
    },
}

/// Scan `text` (which must start at a `{`) tracking container depth and
/// string state.
pub fn scan_object(text: &str) -> ScanOutcome {
    let bytes = text.as_bytes();
    let mut open: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut string_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => {
                in_string = true;
                string_start = i;
            }
            b'{' | b'[' => open.push(b),
            b'}' | b']' => {
                open.pop();
                if open.is_empty() {
                    return ScanOutcome::Balanced(i + 1);
                }
            }
            _ => {}
        }
    }

    ScanOutcome::Truncated {
        open,
        dangling_string: in_string.then_some(string_start),
    }
}

/// Build a repaired JSON candidate from the first `{` in `raw`.
///
/// Returns `None` when the text has no `{`. The returned string is not
/// guaranteed to parse; callers still attempt a parse and treat failure as a
/// miss.
pub fn repair_json_candidate(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let text = &raw[start..];

    let repaired = match scan_object(text) {
        ScanOutcome::Balanced(end) => text[..end].to_string(),
        ScanOutcome::Truncated {
            mut open,
            dangling_string,
        } => {
            tracing::debug!(
                open_containers = open.len(),
                in_string = dangling_string.is_some(),
                "JSON candidate truncated, closing open containers"
            );
            let mut candidate = text.to_string();
            if let Some(quote) = dangling_string {
                candidate.truncate(quote);
            }
            drop_dangling_tail(&mut candidate, &mut open);
            for &delim in open.iter().rev() {
                candidate.push(if delim == b'{' { '}' } else { ']' });
            }
            candidate
        }
    };

    Some(strip_trailing_commas(&repaired))
}

/// Remove material at the end of a truncated candidate that cannot be
/// completed: a key without a value, a partial literal, a trailing comma.
///
/// A container opened right before the cut is dropped along with its key or
/// comma, so `open` is updated to match. The root object is always kept.
fn drop_dangling_tail(candidate: &mut String, open: &mut Vec<u8>) {
    loop {
        let innermost = open.last().copied().unwrap_or(b'{');
        let trimmed_len = candidate.trim_end().len();
        candidate.truncate(trimmed_len);

        let Some(&last) = candidate.as_bytes().last() else {
            return;
        };

        match last {
            b',' => {
                candidate.pop();
            }
            b':' => {
                candidate.pop();
                let trimmed_len = candidate.trim_end().len();
                candidate.truncate(trimmed_len);
                match string_start_before(candidate.as_bytes(), candidate.len()) {
                    Some(key_start) => candidate.truncate(key_start),
                    None => return,
                }
            }
            b'"' => {
                let Some(open_quote) = string_start_before(candidate.as_bytes(), candidate.len())
                else {
                    return;
                };
                let preceding = candidate[..open_quote].trim_end().as_bytes().last().copied();
                let is_key = innermost == b'{' && matches!(preceding, Some(b'{') | Some(b','));
                if is_key {
                    candidate.truncate(open_quote);
                } else {
                    return;
                }
            }
            b'{' | b'[' if open.len() > 1 && open.last() == Some(&last) => {
                candidate.pop();
                open.pop();
            }
            b'{' | b'[' | b'}' | b']' => return,
            _ => {
                let token_start = candidate
                    .as_bytes()
                    .iter()
                    .rposition(|b| !is_scalar_byte(*b))
                    .map(|p| p + 1)
                    .unwrap_or(0);
                if token_start == candidate.len() || is_complete_scalar(&candidate[token_start..])
                {
                    return;
                }
                candidate.truncate(token_start);
            }
        }
    }
}

/// Offset of the opening quote of the string that closes right before `end`.
fn string_start_before(bytes: &[u8], end: usize) -> Option<usize> {
    if end == 0 || bytes[end - 1] != b'"' {
        return None;
    }
    let mut i = end - 1;
    while i > 0 {
        i -= 1;
        if bytes[i] == b'"' {
            let backslashes = bytes[..i].iter().rev().take_while(|&&b| b == b'\\').count();
            if backslashes % 2 == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn is_scalar_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'+')
}

fn is_complete_scalar(token: &str) -> bool {
    match token {
        "true" | "false" | "null" => true,
        _ => {
            token.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
                && token.bytes().last().is_some_and(|b| b.is_ascii_digit())
                && serde_json::from_str::<serde_json::Number>(token).is_ok()
        }
    }
}

/// Remove commas that directly precede a closing `}` or `]`, ignoring commas
/// inside string literals.
pub fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
