//! The repair pipeline: an ordered cascade of parsing strategies.

mod locate;
mod normalize;
pub mod strategies;

pub use locate::locate;
pub use normalize::normalize;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::error::MendError;
use crate::trace::RepairTrace;
use crate::MAX_DEPTH;
use strategies::{default_strategies, RepairStrategy};

/// How aggressively to repair, controlling how many cascade strategies run.
///
/// Levels are cumulative ordinals: `Standard` tries everything `Basic` tries
/// plus one more strategy, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RepairLevel {
    /// Strict parse plus textual normalization.
    Basic = 1,
    /// Adds the comment-tolerant parser.
    Standard = 2,
    /// Adds the maximally permissive decoder.
    Advanced = 3,
}

impl RepairLevel {
    /// Returns the ordinal value of this level.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Maps a numeric level to a `RepairLevel`, clamping out-of-range input.
    pub fn from_ordinal(level: u8) -> Self {
        match level {
            0 | 1 => Self::Basic,
            2 => Self::Standard,
            _ => Self::Advanced,
        }
    }
}

/// Options controlling a repair call.
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Repair level; controls how many strategies are attempted.
    pub level: RepairLevel,
    /// Pretty-print successful output.
    pub pretty: bool,
    /// Indent width for pretty output; `0` means compact even when `pretty`.
    pub indent: usize,
    /// Sort object keys recursively in the output.
    pub sort_keys: bool,
    /// Maximum nesting depth tolerated by the permissive parsers.
    pub max_depth: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            level: RepairLevel::Standard,
            pretty: true,
            indent: 2,
            sort_keys: false,
            max_depth: MAX_DEPTH,
        }
    }
}

/// The result of a repair call.
///
/// `text` is valid JSON when `success` is true, and the original input
/// unchanged when every strategy failed.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// Repaired JSON text, or the original input on failure.
    pub text: String,
    /// True iff `text` parses as valid JSON.
    pub success: bool,
    /// Record of what the cascade attempted.
    pub trace: RepairTrace,
}

/// Cascade of repair strategies tried in priority order.
///
/// The pipeline is stateless across calls; every call receives its own
/// trace and result objects, so a pipeline may be shared freely.
///
/// # Examples
///
/// ```
/// use jsonmend::repair::{RepairOptions, RepairPipeline};
///
/// let pipeline = RepairPipeline::new();
/// let out = pipeline.repair("{'a': 1,}", &RepairOptions::default());
/// assert!(out.success);
/// ```
#[derive(Debug)]
pub struct RepairPipeline {
    strategies: Vec<Box<dyn RepairStrategy>>,
}

impl Default for RepairPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RepairPipeline {
    /// Creates a pipeline with the default strategies and depth limit.
    pub fn new() -> Self {
        Self::with_max_depth(MAX_DEPTH)
    }

    /// Creates a pipeline whose permissive parsers use the given depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            strategies: default_strategies(max_depth),
        }
    }

    /// Returns the names of all registered strategies in priority order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Repairs `input` into valid JSON.
    ///
    /// Strategies run in priority order, truncated to `1 + level` entries;
    /// the first one to produce a value wins, and the winning value is
    /// re-serialized per the output options. If every attempted strategy
    /// fails, the original input is returned unchanged with `success` false.
    pub fn repair(&self, input: &str, options: &RepairOptions) -> RepairOutcome {
        let mut trace = RepairTrace::begin(input);

        if input.trim().is_empty() {
            trace.error = Some(MendError::EmptyInput.to_string());
            trace.finish("", false);
            return RepairOutcome {
                text: String::new(),
                success: false,
                trace,
            };
        }

        let located = locate(input);
        let attempts = 1 + options.level.as_usize();

        for strategy in self.strategies.iter().take(attempts) {
            trace.methods.push(strategy.name());
            match strategy.attempt(located) {
                Ok(value) => {
                    let text = render(&value, located, options);
                    trace.finish(&text, true);
                    return RepairOutcome {
                        text,
                        success: true,
                        trace,
                    };
                }
                Err(_) => {
                    // Swallowed: the next strategy gets its chance.
                }
            }
        }

        trace.error = Some(MendError::InvalidJson("all repair strategies failed".into()).to_string());
        trace.finish(input, false);
        RepairOutcome {
            text: input.to_string(),
            success: false,
            trace,
        }
    }
}

/// Serializes a successfully parsed value per the output options.
///
/// Serialization of an already-parsed value cannot reasonably fail; if it
/// somehow does, the text that parsed is returned unmodified.
fn render(value: &Value, parsed_text: &str, options: &RepairOptions) -> String {
    let mut value = value.clone();
    if options.sort_keys {
        sort_keys_deep(&mut value);
    }

    if !options.pretty || options.indent == 0 {
        return serde_json::to_string(&value).unwrap_or_else(|_| parsed_text.to_string());
    }

    let indent = vec![b' '; options.indent];
    let mut out = Vec::with_capacity(parsed_text.len() * 2);
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));

    if value.serialize(&mut serializer).is_ok() {
        String::from_utf8(out).unwrap_or_else(|_| parsed_text.to_string())
    } else {
        parsed_text.to_string()
    }
}

/// Recursively sorts object keys in place.
fn sort_keys_deep(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys_deep(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => {
            for item in items {
                sort_keys_deep(item);
            }
        }
        _ => {}
    }
}
