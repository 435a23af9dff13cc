//! The path resolution engine: exact traversal with similarity-ranked
//! fallback, plus whole-tree fuzzy search.

mod fuzzy;
mod path;

pub use fuzzy::{fuzzy_search, FuzzyMatch, SCORE_FLOOR};
pub use path::{parse_segments, Segment};

use serde_json::Value;

use crate::error::{MendError, Result};
use crate::similarity::similarity;
use crate::trace::{MatchRecord, MatchTrace};
use crate::MAX_DEPTH;

/// Number of fuzzy candidates recorded in the trace.
const TRACE_MATCH_LIMIT: usize = 5;

/// Options controlling an extraction call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Use whole-tree fuzzy search instead of path traversal.
    pub fuzzy: bool,
    /// Minimum similarity for a partial segment match, inclusive.
    pub min_similarity: f64,
    /// Maximum nesting depth tolerated by the fuzzy walker.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fuzzy: false,
            min_similarity: 0.6,
            max_depth: MAX_DEPTH,
        }
    }
}

/// The result of an extraction call.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// The extracted value as text, or empty on failure.
    pub text: String,
    /// True iff a value was located.
    pub success: bool,
    /// Record of the matches attempted and made.
    pub trace: MatchTrace,
}

impl ExtractOutcome {
    fn failure(trace: MatchTrace) -> Self {
        Self {
            text: String::new(),
            success: false,
            trace,
        }
    }
}

/// Extracts a value from JSON text by path, with default options.
///
/// # Examples
///
/// ```
/// use jsonmend::extract;
///
/// let doc = r#"{"user": {"tags": ["a", "b"]}}"#;
/// let out = extract(doc, &["user", "tags[1]"]);
/// assert!(out.success);
/// assert_eq!(out.text, "b");
/// ```
pub fn extract<S: AsRef<str>>(json: &str, segments: &[S]) -> ExtractOutcome {
    extract_with(json, segments, &ExtractOptions::default())
}

/// Extracts a value from JSON text by path.
///
/// The text is parsed strictly; parse failure is reported in the trace, not
/// raised. See [`resolve_value`] for the resolution rules.
pub fn extract_with<S: AsRef<str>>(
    json: &str,
    segments: &[S],
    options: &ExtractOptions,
) -> ExtractOutcome {
    let cleaned = parse_segments(segments);
    let requested: Vec<String> = cleaned.iter().map(|s| s.raw.clone()).collect();

    if json.trim().is_empty() {
        let mut trace = MatchTrace::begin(requested, options.fuzzy);
        trace.error = Some(MendError::EmptyInput.to_string());
        return ExtractOutcome::failure(trace);
    }

    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            let mut trace = MatchTrace::begin(requested, options.fuzzy);
            trace.error = Some(MendError::InvalidJson(e.to_string()).to_string());
            return ExtractOutcome::failure(trace);
        }
    };

    resolve_segments(&value, cleaned, options)
}

/// Extracts a value from an already-parsed JSON value by path.
///
/// Resolution is three-tier:
/// 1. exact traversal of every segment;
/// 2. on a not-found condition, a partial re-walk that substitutes each
///    unresolvable segment with its most similar sibling key at or above
///    `min_similarity` (inclusive), skipping segments with no candidate;
/// 3. in fuzzy mode, a whole-tree search for the final segment's key name.
pub fn resolve_value<S: AsRef<str>>(
    value: &Value,
    segments: &[S],
    options: &ExtractOptions,
) -> ExtractOutcome {
    resolve_segments(value, parse_segments(segments), options)
}

fn resolve_segments(value: &Value, segments: Vec<Segment>, options: &ExtractOptions) -> ExtractOutcome {
    let requested: Vec<String> = segments.iter().map(|s| s.raw.clone()).collect();
    let mut trace = MatchTrace::begin(requested, options.fuzzy);

    // No usable path: the whole document is the result.
    if segments.is_empty() {
        trace.note = Some("no path supplied; returning whole document".into());
        return ExtractOutcome {
            text: stringify(value),
            success: true,
            trace,
        };
    }

    if options.fuzzy {
        return resolve_fuzzy(value, &segments, options, trace);
    }

    // Exact phase: all segments must resolve, or none do.
    match exact_walk(value, &segments) {
        Ok(leaf) => {
            let joined = join_raw(&segments);
            trace.records.push(MatchRecord::Exact { path: joined });
            ExtractOutcome {
                text: stringify(leaf),
                success: true,
                trace,
            }
        }
        Err(err) if err.is_not_found() => partial_walk(value, &segments, options, trace),
        Err(err) => {
            trace.error = Some(err.to_string());
            ExtractOutcome::failure(trace)
        }
    }
}

/// Fuzzy mode: search the whole tree for the last segment's key name.
fn resolve_fuzzy(
    value: &Value,
    segments: &[Segment],
    options: &ExtractOptions,
    mut trace: MatchTrace,
) -> ExtractOutcome {
    let target = &segments[segments.len() - 1].raw;

    let matches = match fuzzy_search(value, target, options.max_depth) {
        Ok(matches) => matches,
        Err(err) => {
            trace.error = Some(err.to_string());
            return ExtractOutcome::failure(trace);
        }
    };

    for m in matches.iter().take(TRACE_MATCH_LIMIT) {
        trace.records.push(MatchRecord::Fuzzy {
            path: m.path.clone(),
            similarity: m.score,
        });
    }

    match matches.first() {
        Some(best) => ExtractOutcome {
            text: stringify(best.value),
            success: true,
            trace,
        },
        None => {
            trace.error = Some(MendError::NotFound.to_string());
            ExtractOutcome::failure(trace)
        }
    }
}

/// Walks every segment exactly; fails as a whole on the first miss.
fn exact_walk<'a>(root: &'a Value, segments: &[Segment]) -> Result<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = exact_step(current, segment)?;
    }
    Ok(current)
}

/// Resolves one segment against the current node.
fn exact_step<'a>(current: &'a Value, segment: &Segment) -> Result<&'a Value> {
    let object = current.as_object().ok_or_else(|| MendError::KeyNotFound {
        segment: segment.raw.clone(),
    })?;

    match segment.index {
        Some(index) => {
            let array = object
                .get(&segment.key)
                .ok_or_else(|| MendError::KeyNotFound {
                    segment: segment.raw.clone(),
                })?
                .as_array()
                .ok_or_else(|| MendError::MalformedSegment {
                    segment: segment.raw.clone(),
                })?;

            array.get(index).ok_or_else(|| MendError::MalformedSegment {
                segment: segment.raw.clone(),
            })
        }
        None => object.get(&segment.key).ok_or_else(|| MendError::KeyNotFound {
            segment: segment.raw.clone(),
        }),
    }
}

/// Partial fallback: re-walks from the root, substituting unresolvable
/// segments with their closest sibling key; segments with no candidate at or
/// above the threshold are skipped.
fn partial_walk(
    root: &Value,
    segments: &[Segment],
    options: &ExtractOptions,
    mut trace: MatchTrace,
) -> ExtractOutcome {
    // A non-object root has no keys to fall back on at all.
    if !root.is_object() {
        trace.error = Some(
            MendError::KeyNotFound {
                segment: segments[0].raw.clone(),
            }
            .to_string(),
        );
        return ExtractOutcome::failure(trace);
    }

    let mut current = root;
    let mut matched_path: Vec<String> = Vec::new();

    for segment in segments {
        if let Ok(next) = exact_step(current, segment) {
            matched_path.push(segment.raw.clone());
            current = next;
            continue;
        }

        if let Some(object) = current.as_object() {
            let mut candidates: Vec<(&String, &Value, f64)> = object
                .iter()
                .map(|(key, child)| (key, child, similarity(&segment.raw, key)))
                .filter(|(_, _, score)| *score >= options.min_similarity)
                .collect();
            // Stable: ties keep the object's insertion order.
            candidates
                .sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

            if let Some(&(key, child, score)) = candidates.first() {
                trace.records.push(MatchRecord::Partial {
                    requested: segment.raw.clone(),
                    matched: key.clone(),
                    similarity: score,
                });
                matched_path.push(key.clone());
                current = child;
                continue;
            }
        }

        // No candidate at this level: skip the segment and keep going.
    }

    if matched_path.is_empty() {
        trace.error = Some(MendError::NotFound.to_string());
        return ExtractOutcome::failure(trace);
    }

    trace.records.push(MatchRecord::FinalPath {
        path: matched_path.join("."),
    });
    ExtractOutcome {
        text: stringify(current),
        success: true,
        trace,
    }
}

fn join_raw(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.raw.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// Stringifies an extracted value: composites are JSON-serialized, scalars
/// use their native text form.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        composite => serde_json::to_string(composite).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc() -> String {
        json!({
            "user_name": "Alice",
            "a": {"b": [1, 2, 3]},
            "meta": {"created": "2024-01-01"}
        })
        .to_string()
    }

    #[test]
    fn test_exact_indexed_path() {
        let out = extract(&doc(), &["a", "b[1]"]);
        assert!(out.success);
        assert_eq!(out.text, "2");
        assert_eq!(
            out.trace.records,
            vec![MatchRecord::Exact {
                path: "a.b[1]".into()
            }]
        );
    }

    #[test]
    fn test_whole_document_on_empty_path() {
        let out = extract(&doc(), &[] as &[&str]);
        assert!(out.success);
        assert_eq!(out.text, doc());
        assert!(out.trace.note.is_some());
    }

    #[test]
    fn test_blank_segments_mean_no_path() {
        let out = extract(&doc(), &["", "   "]);
        assert!(out.success);
        assert_eq!(out.text, doc());
    }

    #[test]
    fn test_partial_fallback_snake_case() {
        let out = extract(&doc(), &["username"]);
        assert!(out.success);
        assert_eq!(out.text, "Alice");

        let partial = out
            .trace
            .records
            .iter()
            .find(|r| matches!(r, MatchRecord::Partial { .. }))
            .expect("partial record");
        if let MatchRecord::Partial {
            requested,
            matched,
            similarity,
        } = partial
        {
            assert_eq!(requested, "username");
            assert_eq!(matched, "user_name");
            assert!(*similarity >= 0.6);
        }
    }

    #[test]
    fn test_partial_records_final_path() {
        let out = extract(&doc(), &["username"]);
        assert!(out
            .trace
            .records
            .iter()
            .any(|r| matches!(r, MatchRecord::FinalPath { path } if path == "user_name")));
    }

    #[test]
    fn test_threshold_inclusive_at_boundary() {
        // lcs("abcd", "abczpq") = 3, ratio = 2*3/(4+6) = 0.6 exactly.
        let json = r#"{"abczpq": 7}"#;
        let hit = extract_with(
            json,
            &["abcd"],
            &ExtractOptions {
                min_similarity: 0.6,
                ..ExtractOptions::default()
            },
        );
        assert!(hit.success);
        assert_eq!(hit.text, "7");

        let miss = extract_with(
            json,
            &["abcd"],
            &ExtractOptions {
                min_similarity: 0.61,
                ..ExtractOptions::default()
            },
        );
        assert!(!miss.success);
    }

    #[test]
    fn test_unmatched_segment_is_skipped() {
        // "zzz" matches nothing and is skipped; "b[0]" then resolves
        // against the same node reached by "a".
        let json = json!({"a": {"b": [10, 20]}}).to_string();
        let out = extract(&json, &["a", "zzz", "b[0]"]);
        assert!(out.success);
        assert_eq!(out.text, "10");
    }

    #[test]
    fn test_not_found_when_nothing_matches() {
        let out = extract(&doc(), &["qqq"]);
        assert!(!out.success);
        assert_eq!(out.text, "");
        assert!(out.trace.error.is_some());
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        // b[9] is out of range; fallback skips it but "a" already matched.
        let json = json!({"a": {"b": [1]}}).to_string();
        let out = extract(&json, &["a", "b[9]"]);
        assert!(out.success);
        // "a" matched exactly, "b[9]" was skipped, result is a's value.
        assert_eq!(out.text, r#"{"b":[1]}"#);
    }

    #[test]
    fn test_invalid_json_reported_in_trace() {
        let out = extract("{broken", &["a"]);
        assert!(!out.success);
        assert!(out.trace.error.as_deref().unwrap().contains("invalid JSON"));
    }

    #[test]
    fn test_empty_input_reported_in_trace() {
        let out = extract("  ", &["a"]);
        assert!(!out.success);
        assert_eq!(out.trace.error.as_deref(), Some("empty input"));
    }

    #[test]
    fn test_scalar_root_is_key_not_found() {
        let out = extract("42", &["a"]);
        assert!(!out.success);
        assert!(out.trace.error.as_deref().unwrap().contains("key not found"));
    }

    #[test]
    fn test_fuzzy_mode_finds_best_match() {
        let json = json!({"a": {"id": 1}, "b": {"ident": 2}}).to_string();
        let out = extract_with(
            &json,
            &["id"],
            &ExtractOptions {
                fuzzy: true,
                ..ExtractOptions::default()
            },
        );
        assert!(out.success);
        assert_eq!(out.text, "1");
        assert!(matches!(
            out.trace.records.first(),
            Some(MatchRecord::Fuzzy { path, .. }) if path == "a.id"
        ));
    }

    #[test]
    fn test_fuzzy_mode_uses_last_segment() {
        let json = json!({"outer": {"user_name": "Bob"}}).to_string();
        let out = extract_with(
            &json,
            &["ignored", "username"],
            &ExtractOptions {
                fuzzy: true,
                ..ExtractOptions::default()
            },
        );
        assert!(out.success);
        assert_eq!(out.text, "Bob");
    }

    #[test]
    fn test_fuzzy_mode_not_found() {
        let out = extract_with(
            &doc(),
            &["qqqqq"],
            &ExtractOptions {
                fuzzy: true,
                ..ExtractOptions::default()
            },
        );
        assert!(!out.success);
        assert!(out.trace.records.is_empty());
    }

    #[test]
    fn test_composite_results_are_serialized() {
        let out = extract(&doc(), &["a"]);
        assert!(out.success);
        assert_eq!(out.text, r#"{"b":[1,2,3]}"#);
    }

    #[test]
    fn test_scalar_stringification() {
        let json = r#"{"t": true, "n": null, "f": 1.5, "s": "raw"}"#;
        assert_eq!(extract(json, &["t"]).text, "true");
        assert_eq!(extract(json, &["n"]).text, "null");
        assert_eq!(extract(json, &["f"]).text, "1.5");
        assert_eq!(extract(json, &["s"]).text, "raw");
    }
}
