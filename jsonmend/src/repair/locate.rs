//! Locates the most likely JSON payload inside free-form text.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w*)\n(.*?)```").expect("invalid code fence pattern"));

/// Extracts the most likely JSON substring from `input`.
///
/// Methods are tried in order and only the first hit is used:
/// 1. the body of the first fenced code block (optionally tagged, e.g.
///    ` ```json `);
/// 2. the first balanced `{`...`}` span, found by depth counting;
/// 3. the first balanced `[`...`]` span;
/// 4. the trimmed input unchanged.
///
/// The depth scan tracks string literals and escapes, so braces embedded in
/// string values do not terminate the span early.
pub fn locate(input: &str) -> &str {
    if let Some(cap) = CODE_FENCE.captures(input) {
        let body = cap.get(2).map_or("", |m| m.as_str()).trim();
        if !body.is_empty() {
            return body;
        }
    }

    if let Some(span) = balanced_span(input, '{', '}') {
        return span;
    }
    if let Some(span) = balanced_span(input, '[', ']') {
        return span;
    }

    input.trim()
}

/// Finds the first balanced `open`...`close` span by depth counting.
fn balanced_span(input: &str, open: char, close: char) -> Option<&str> {
    let start = input.find(open)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, ch) in input[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' | '\'' => in_string = !in_string,
            _ if ch == open && !in_string => depth += 1,
            _ if ch == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
