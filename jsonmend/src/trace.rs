//! Trace records describing how a repair or extraction was performed.
//!
//! Traces are a diagnostics side channel: they never influence control flow
//! beyond the best-score selection that produced them. Each trace offers an
//! `explanation_json()` view for callers that want a serialized report.

use serde_json::{json, Value};

/// Maximum number of characters kept in a trace preview.
pub const PREVIEW_LEN: usize = 100;

/// Truncates text to [`PREVIEW_LEN`] characters for trace previews.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_LEN).collect();
    if text.chars().count() > PREVIEW_LEN {
        out.push_str("...");
    }
    out
}

/// Record of a single repair pass through the cascade.
#[derive(Debug, Clone)]
pub struct RepairTrace {
    /// Length of the original input in characters.
    pub original_length: usize,
    /// First characters of the original input.
    pub original_preview: String,
    /// Names of the strategies attempted, in order. On success the last
    /// entry is the strategy that produced the result.
    pub methods: Vec<&'static str>,
    /// True iff the final text parses as valid JSON.
    pub success: bool,
    /// Length of the returned text in characters.
    pub final_length: usize,
    /// First characters of the returned text.
    pub final_preview: String,
    /// Terminal error message when the cascade failed.
    pub error: Option<String>,
}

impl RepairTrace {
    /// Starts a trace for the given input.
    pub(crate) fn begin(input: &str) -> Self {
        Self {
            original_length: input.chars().count(),
            original_preview: preview(input),
            methods: Vec::new(),
            success: false,
            final_length: 0,
            final_preview: String::new(),
            error: None,
        }
    }

    /// Records the outcome text and success flag.
    pub(crate) fn finish(&mut self, text: &str, success: bool) {
        self.success = success;
        self.final_length = text.chars().count();
        self.final_preview = preview(text);
    }

    /// Returns a JSON representation of this trace for diagnostics.
    pub fn explanation_json(&self) -> Value {
        json!({
            "original_length": self.original_length,
            "original_preview": &self.original_preview,
            "methods": &self.methods,
            "success": self.success,
            "final_length": self.final_length,
            "final_preview": &self.final_preview,
            "error": &self.error,
        })
    }
}

/// A single match event recorded during path resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRecord {
    /// The full path resolved exactly.
    Exact {
        /// The `.`-joined requested path.
        path: String,
    },
    /// A segment was substituted by its closest sibling key.
    Partial {
        /// The segment the caller asked for.
        requested: String,
        /// The key it was matched to.
        matched: String,
        /// Similarity score in `[0.0, 1.0]`.
        similarity: f64,
    },
    /// A fuzzy-search candidate anywhere in the tree.
    Fuzzy {
        /// Dotted/indexed path to the candidate key.
        path: String,
        /// Similarity score in `[0.0, 1.0]`.
        similarity: f64,
    },
    /// The `.`-joined path actually walked after partial fallback.
    FinalPath {
        /// The matched path.
        path: String,
    },
}

impl MatchRecord {
    /// Returns a short human-readable description of this record.
    pub fn description(&self) -> String {
        match self {
            Self::Exact { path } => format!("exact match: {path}"),
            Self::Partial {
                requested,
                matched,
                similarity,
            } => format!("partial match: '{requested}' -> '{matched}' ({similarity:.2})"),
            Self::Fuzzy { path, similarity } => format!("fuzzy match: {path} ({similarity:.2})"),
            Self::FinalPath { path } => format!("final path: {path}"),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Exact { path } => json!({"type": "exact", "path": path}),
            Self::Partial {
                requested,
                matched,
                similarity,
            } => json!({
                "type": "partial",
                "requested": requested,
                "matched": matched,
                "similarity": format!("{similarity:.2}"),
            }),
            Self::Fuzzy { path, similarity } => json!({
                "type": "fuzzy",
                "path": path,
                "similarity": format!("{similarity:.2}"),
            }),
            Self::FinalPath { path } => json!({"type": "final_path", "path": path}),
        }
    }
}

/// Record of a single path-resolution or fuzzy-search call.
#[derive(Debug, Clone, Default)]
pub struct MatchTrace {
    /// The cleaned path segments that were requested.
    pub requested: Vec<String>,
    /// Whether fuzzy mode was used.
    pub fuzzy: bool,
    /// Match events, in the order they occurred.
    pub records: Vec<MatchRecord>,
    /// Informational note (e.g. "no path supplied").
    pub note: Option<String>,
    /// Terminal error message when resolution failed.
    pub error: Option<String>,
}

impl MatchTrace {
    /// Starts a trace for the given cleaned path.
    pub(crate) fn begin(requested: Vec<String>, fuzzy: bool) -> Self {
        Self {
            requested,
            fuzzy,
            ..Self::default()
        }
    }

    /// Returns a JSON representation of this trace for diagnostics.
    pub fn explanation_json(&self) -> Value {
        json!({
            "path": &self.requested,
            "fuzzy": self.fuzzy,
            "matches": self.records.iter().map(MatchRecord::to_json).collect::<Vec<_>>(),
            "note": &self.note,
            "error": &self.error,
        })
    }
}
