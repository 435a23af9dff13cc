//! # jsonmend
//!
//! Repairs malformed, "almost-JSON" text into valid JSON, and extracts
//! values from it by exact or fuzzy paths.
//!
//! LLMs routinely emit near-JSON: trailing commas, unquoted keys, single
//! quotes, comments, markdown fences, prose around the payload. This crate
//! handles those through two engines:
//!
//! - a **repair cascade**: an ordered list of parsing strategies of
//!   increasing permissiveness, tried until one succeeds, with a trace of
//!   which technique won;
//! - a **path resolver**: traversal of a parsed value by `key` / `key[index]`
//!   segments, falling back per-segment to similarity-ranked partial
//!   matching, or to a whole-tree fuzzy search in fuzzy mode.
//!
//! Both engines are total: they never panic and never propagate errors, the
//! caller always gets a `(text, success, trace)`-shaped outcome.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonmend::{repair, extract};
//!
//! // Repair messy LLM output
//! let out = repair("{'name': 'Alice', age: 30,} // profile");
//! assert!(out.success);
//!
//! // Extract by exact dotted/indexed path
//! let doc = r#"{"user": {"tags": ["a", "b", "c"]}}"#;
//! let got = extract(doc, &["user", "tags[1]"]);
//! assert_eq!(got.text, "b");
//! ```
//!
//! ## Fuzzy extraction
//!
//! When the exact key name is unknown or slightly wrong:
//!
//! ```rust
//! use jsonmend::{extract_with, ExtractOptions};
//!
//! let doc = r#"{"profile": {"user_name": "Alice"}}"#;
//! let options = ExtractOptions { fuzzy: true, ..ExtractOptions::default() };
//! let got = extract_with(doc, &["username"], &options);
//! assert!(got.success);
//! assert_eq!(got.text, "Alice");
//! ```

pub mod error;
pub mod extract;
pub mod repair;
pub mod similarity;
pub mod trace;

pub use error::{MendError, Result};
pub use extract::{
    extract, extract_with, fuzzy_search, resolve_value, ExtractOptions, ExtractOutcome, FuzzyMatch,
};
pub use repair::{RepairLevel, RepairOptions, RepairOutcome, RepairPipeline};
pub use trace::{MatchRecord, MatchTrace, RepairTrace};

/// Default maximum nesting depth for the permissive parsers and tree walks.
///
/// Exceeding the limit is treated as a failure of the operation at hand,
/// never a crash.
pub const MAX_DEPTH: usize = 128;

/// Repairs malformed JSON-like text with default options.
///
/// Equivalent to [`repair_with`] with [`RepairOptions::default`]: standard
/// repair level, pretty output at two-space indent.
///
/// # Examples
///
/// ```
/// use jsonmend::repair;
///
/// let out = repair("{\"a\": 1,} // trailing comma and comment");
/// assert!(out.success);
///
/// // Hopeless input comes back unchanged.
/// let out = repair("not json at all {{{");
/// assert!(!out.success);
/// assert_eq!(out.text, "not json at all {{{");
/// ```
pub fn repair(input: &str) -> RepairOutcome {
    repair_with(input, &RepairOptions::default())
}

/// Repairs malformed JSON-like text.
///
/// The repair level selects how many cascade strategies are attempted; see
/// [`RepairPipeline::repair`] for the strategy order. The outcome's trace
/// records every strategy attempted and the terminal error, if any.
///
/// # Examples
///
/// ```
/// use jsonmend::{repair_with, RepairLevel, RepairOptions};
///
/// let options = RepairOptions {
///     level: RepairLevel::Advanced,
///     pretty: false,
///     ..RepairOptions::default()
/// };
/// let out = repair_with("{status: pending}", &options);
/// assert!(out.success);
/// assert_eq!(out.text, r#"{"status":"pending"}"#);
/// ```
pub fn repair_with(input: &str, options: &RepairOptions) -> RepairOutcome {
    RepairPipeline::with_max_depth(options.max_depth).repair(input, options)
}
