//! Strict JSON parsing strategy.

use serde_json::Value;

use super::RepairStrategy;
use crate::error::{MendError, Result};

/// Strategy that parses the input as-is.
///
/// This is the fastest strategy and is always tried first. It succeeds only
/// if the entire input (after trimming whitespace) is valid JSON.
///
/// # Examples
///
/// ```
/// use jsonmend::repair::strategies::{RepairStrategy, StrictStrategy};
///
/// let value = StrictStrategy.attempt(r#"{"name": "Alice"}"#).unwrap();
/// assert_eq!(value["name"], "Alice");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictStrategy;

impl RepairStrategy for StrictStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "strict"
    }

    fn attempt(&self, input: &str) -> Result<Value> {
        let trimmed = input.trim();

        // Fast path: skip the parse attempt for obviously non-JSON text.
        if !looks_like_json(trimmed) {
            return Err(MendError::strategy("strict", "input is not JSON-shaped"));
        }

        serde_json::from_str(trimmed).map_err(|e| MendError::InvalidJson(e.to_string()))
    }

    #[inline]
    fn priority(&self) -> u8 {
        1
    }
}

/// Fast heuristic check to avoid a doomed parse attempt.
#[inline]
fn looks_like_json(s: &str) -> bool {
    matches!(s.chars().next(), Some('{') | Some('[') | Some('"'))
        || s.starts_with("true")
        || s.starts_with("false")
        || s.starts_with("null")
        || s.chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-')
}
