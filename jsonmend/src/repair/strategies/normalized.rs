//! Normalize-then-parse strategy.

use serde_json::Value;

use super::RepairStrategy;
use crate::error::{MendError, Result};
use crate::repair::{normalize, RepairLevel};

/// Strategy that runs the textual normalizer, then parses the result.
///
/// The normalizer always runs at [`RepairLevel::Advanced`], regardless of the
/// cascade's caller-supplied level: the caller's level controls *how many*
/// strategies are tried, not how hard each one tries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeStrategy;

impl RepairStrategy for NormalizeStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn attempt(&self, input: &str) -> Result<Value> {
        let (normalized, ok) = normalize(input, RepairLevel::Advanced);
        if !ok {
            return Err(MendError::strategy("normalize", "normalization failed"));
        }

        serde_json::from_str(&normalized).map_err(|e| MendError::InvalidJson(e.to_string()))
    }

    #[inline]
    fn priority(&self) -> u8 {
        2
    }
}
