//! Whole-tree fuzzy key search.

use serde_json::Value;

use crate::error::{MendError, Result};
use crate::similarity::similarity;

/// Minimum similarity for a key to be recorded as a fuzzy candidate.
///
/// This floor is fixed and independent of the caller-supplied threshold used
/// by partial path matching.
pub const SCORE_FLOOR: f64 = 0.5;

/// A fuzzy-search candidate: a key somewhere in the tree whose name is close
/// to the requested one.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    /// Dotted/indexed path to the matched key, e.g. `users[0].user_name`.
    pub path: String,
    /// The value stored under the matched key.
    pub value: &'a Value,
    /// Similarity score in `[0.5, 1.0]`.
    pub score: f64,
}

/// Work items for the iterative pre-order walk.
enum Task<'a> {
    /// Descend into a composite value.
    Visit(&'a Value, String, usize),
    /// Score an object key, then descend into its value.
    Entry(&'a str, &'a Value, String, usize),
}

/// Searches every object key in the tree for names similar to `target`.
///
/// Traversal is pre-order depth-first in insertion order, implemented
/// iteratively so adversarial nesting cannot exhaust the stack; nesting
/// beyond `max_depth` is reported as an error instead. Array elements are
/// descended into but not themselves scored.
///
/// The result is sorted by descending score; ties keep traversal order, so
/// the first-encountered key wins. An empty result means "not found".
///
/// # Examples
///
/// ```
/// use jsonmend::extract::fuzzy_search;
/// use serde_json::json;
///
/// let doc = json!({"a": {"id": 1}, "b": {"ident": 2}});
/// let matches = fuzzy_search(&doc, "id", 64).unwrap();
/// assert_eq!(matches[0].path, "a.id");
/// assert_eq!(matches[0].score, 1.0);
/// ```
pub fn fuzzy_search<'a>(
    root: &'a Value,
    target: &str,
    max_depth: usize,
) -> Result<Vec<FuzzyMatch<'a>>> {
    let mut results: Vec<FuzzyMatch<'a>> = Vec::new();
    let mut stack: Vec<Task<'a>> = vec![Task::Visit(root, String::new(), 0)];

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(node, prefix, depth) => {
                if depth > max_depth {
                    return Err(MendError::DepthLimitExceeded {
                        depth,
                        max_depth,
                    });
                }

                match node {
                    Value::Object(map) => {
                        // Entries pushed in reverse so they pop in insertion
                        // order; each entry descends before its next sibling.
                        for (key, child) in map.iter().rev() {
                            stack.push(Task::Entry(key, child, prefix.clone(), depth));
                        }
                    }
                    Value::Array(items) => {
                        for (i, item) in items.iter().enumerate().rev() {
                            if item.is_object() || item.is_array() {
                                let path = if prefix.is_empty() {
                                    format!("[{i}]")
                                } else {
                                    format!("{prefix}[{i}]")
                                };
                                stack.push(Task::Visit(item, path, depth + 1));
                            }
                        }
                    }
                    _ => {}
                }
            }
            Task::Entry(key, child, prefix, depth) => {
                let path = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };

                let score = similarity(target, key);
                if score >= SCORE_FLOOR {
                    results.push(FuzzyMatch {
                        path: path.clone(),
                        value: child,
                        score,
                    });
                }

                if child.is_object() || child.is_array() {
                    stack.push(Task::Visit(child, path, depth + 1));
                }
            }
        }
    }

    // Stable sort: ties keep pre-order traversal position.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_exact_key_ranks_first() {
        let doc = json!({"a": {"id": 1}, "b": {"ident": 2}});
        let matches = fuzzy_search(&doc, "id", 64).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].path, "a.id");
        assert_eq!(matches[0].score, 1.0);
        assert_eq!(matches[1].path, "b.ident");
        assert!(matches[1].score < 1.0);
    }

    #[test]
    fn test_floor_excludes_weak_candidates() {
        let doc = json!({"zzz": 1, "identifier": 2});
        let matches = fuzzy_search(&doc, "id", 64).unwrap();

        // "zzz" scores 0.0 and is dropped; lcs("id", "identifier") = 2,
        // ratio 2*2/12 < 0.5, so it is dropped too.
        assert!(matches.is_empty());
    }

    #[test]
    fn test_array_elements_descended_not_scored() {
        let doc = json!({"users": [{"user_id": 1}, {"user_id": 2}]});
        let matches = fuzzy_search(&doc, "user_id", 64).unwrap();

        let paths: Vec<_> = matches.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["users[0].user_id", "users[1].user_id"]);
    }

    #[test]
    fn test_tie_break_is_traversal_order() {
        let doc = json!({"outer": {"name": 1}, "name": 2});
        let matches = fuzzy_search(&doc, "name", 64).unwrap();

        // Both score 1.0; "outer.name" is encountered first in pre-order.
        assert_eq!(matches[0].path, "outer.name");
        assert_eq!(matches[1].path, "name");
    }

    #[test]
    fn test_empty_result_for_scalar_root() {
        let doc = json!(42);
        assert!(fuzzy_search(&doc, "id", 64).unwrap().is_empty());
    }

    #[test]
    fn test_depth_limit_is_error() {
        let mut doc = json!({"leaf": 1});
        for _ in 0..10 {
            doc = json!({ "nest": doc });
        }
        assert!(matches!(
            fuzzy_search(&doc, "leaf", 3),
            Err(MendError::DepthLimitExceeded { .. })
        ));
    }
}
