//! Path segment grammar: plain keys and `key[index]` array accesses.

use once_cell::sync::Lazy;
use regex::Regex;

static INDEXED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\[(\d+)\]$").expect("invalid indexed key pattern"));

/// One hop of an extraction path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The segment exactly as the caller supplied it (trimmed).
    pub raw: String,
    /// The key portion; equal to `raw` for plain segments.
    pub key: String,
    /// Array index when the segment matches the `key[index]` grammar.
    pub index: Option<usize>,
}

impl Segment {
    /// Parses a single trimmed segment.
    fn parse(raw: &str) -> Self {
        if let Some(cap) = INDEXED_KEY.captures(raw) {
            let key = cap.get(1).map_or("", |m| m.as_str()).to_string();
            // An index too large for usize can never be in range; falling
            // back to a plain key yields the same not-found outcome.
            if let Ok(index) = cap[2].parse::<usize>() {
                return Self {
                    raw: raw.to_string(),
                    key,
                    index: Some(index),
                };
            }
        }

        Self {
            raw: raw.to_string(),
            key: raw.to_string(),
            index: None,
        }
    }
}

/// Splits caller-supplied path entries into usable segments.
///
/// Entries are trimmed and blank ones discarded; order is preserved.
pub fn parse_segments<S: AsRef<str>>(path: &[S]) -> Vec<Segment> {
    path.iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(Segment::parse)
        .collect()
}
