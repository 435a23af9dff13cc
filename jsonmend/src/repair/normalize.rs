//! Textual normalization passes for common JSON-like deviations.
//!
//! These are best-effort text rewrites, not comment- or string-aware parsing:
//! a pass may touch content inside string literals. The function is gated by
//! a final strict parse, so a rewrite that corrupts the text simply rejects
//! the whole normalization instead of producing bad output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::RepairLevel;

static LINE_COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)//.*$").expect("invalid line comment pattern"));

static BLOCK_COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid block comment pattern"));

static TRAILING_COMMAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("invalid trailing comma pattern"));

static SINGLE_QUOTED_KEYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']+)'(\s*:)").expect("invalid quoted key pattern"));

static SINGLE_QUOTED_VALUES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*'([^']*)'([,}\]])").expect("invalid quoted value pattern"));

static BARE_KEYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)\s*:").expect("invalid bare key pattern")
});

static SPECIAL_LITERALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":\s*(Infinity|-Infinity|NaN)\s*([,}\]])").expect("invalid literal pattern")
});

static HEX_LITERALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":\s*(0x[0-9a-fA-F]+)\s*([,}\]])").expect("invalid hex pattern")
});

/// Strips `//` line comments and `/* */` block comments.
fn remove_comments(text: &str) -> String {
    let text = LINE_COMMENTS.replace_all(text, "");
    BLOCK_COMMENTS.replace_all(&text, "").into_owned()
}

/// Removes commas immediately preceding a closing `]` or `}`.
fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMAS.replace_all(text, "${1}").into_owned()
}

/// Converts single-quoted keys and delimiter-adjacent single-quoted values
/// into double-quoted form.
fn fix_quotes(text: &str) -> String {
    let text = SINGLE_QUOTED_KEYS.replace_all(text, "\"${1}\"${2}");
    SINGLE_QUOTED_VALUES
        .replace_all(&text, ": \"${1}\"${2}")
        .into_owned()
}

/// Quotes bare identifier keys that precede a colon.
fn fix_unquoted_keys(text: &str) -> String {
    BARE_KEYS.replace_all(text, "${1}\"${2}\":").into_owned()
}

/// Rewrites `Infinity`, `-Infinity`, `NaN`, and hex integer literals into
/// quoted strings; standard JSON has no such literals.
fn format_numeric_values(text: &str) -> String {
    let text = SPECIAL_LITERALS.replace_all(text, ": \"${1}\"${2}");
    HEX_LITERALS.replace_all(&text, ": \"${1}\"${2}").into_owned()
}

/// Repairs structural problems: wraps bare object fragments, or appends
/// missing closers for unbalanced brackets.
///
/// A mismatched closer aborts the repair and returns the text unchanged.
fn fix_structure(text: &str) -> String {
    let trimmed = text.trim();

    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return format!("{{{trimmed}}}");
    }

    let mut stack: Vec<char> = Vec::new();
    for ch in trimmed.chars() {
        match ch {
            '(' | '{' | '[' => stack.push(ch),
            ')' | '}' | ']' => {
                let expected = match stack.pop() {
                    Some('(') => ')',
                    Some('{') => '}',
                    Some('[') => ']',
                    _ => return trimmed.to_string(),
                };
                if ch != expected {
                    return trimmed.to_string();
                }
            }
            _ => {}
        }
    }

    let mut repaired = trimmed.to_string();
    while let Some(open) = stack.pop() {
        repaired.push(match open {
            '(' => ')',
            '{' => '}',
            _ => ']',
        });
    }
    repaired
}

/// Normalizes JSON-like text at the given repair level.
///
/// Passes run in fixed order and are cumulative across levels:
/// - level >= 1: comment removal, trailing comma removal
/// - level >= 2: quote fixes, bare key quoting, non-standard numeric literals
/// - level >= 3: structure repair (wrapping / bracket balancing)
///
/// The rewritten text is then parsed strictly. On success the rewritten text
/// is returned with `true`; on failure the *original* input is returned with
/// `false`; intermediate rewrites are never exposed on their own.
pub fn normalize(text: &str, level: RepairLevel) -> (String, bool) {
    let mut current = text.to_string();

    if level >= RepairLevel::Basic {
        current = remove_comments(&current);
        current = remove_trailing_commas(&current);
    }

    if level >= RepairLevel::Standard {
        current = fix_quotes(&current);
        current = fix_unquoted_keys(&current);
        current = format_numeric_values(&current);
    }

    if level >= RepairLevel::Advanced {
        current = fix_structure(&current);
    }

    if serde_json::from_str::<Value>(&current).is_ok() {
        (current, true)
    } else {
        (text.to_string(), false)
    }
}
