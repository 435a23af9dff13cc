//! Error types for repair and extraction.

/// Result type alias for repair and extraction operations.
pub type Result<T> = std::result::Result<T, MendError>;

/// Errors that can occur while repairing or extracting.
///
/// None of these escape the public entry points: `repair` and `extract`
/// fold every failure into a `(text, success, trace)` outcome. The enum
/// exists for the internal strategy/fallback plumbing and for callers that
/// drive the lower-level pieces directly.
#[derive(Debug, thiserror::Error)]
pub enum MendError {
    /// The input was empty or contained only whitespace.
    #[error("empty input")]
    EmptyInput,

    /// The text is not valid JSON and no repair strategy could fix it.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A path segment named a key that does not exist at the current level.
    #[error("key not found: {segment}")]
    KeyNotFound {
        /// The segment that failed to resolve.
        segment: String,
    },

    /// Partial fallback was exhausted without matching a single segment.
    #[error("no match found for the requested path")]
    NotFound,

    /// An indexed segment referenced a non-array value or an out-of-range
    /// index. Treated like [`MendError::KeyNotFound`] for fallback purposes.
    #[error("invalid array access: {segment}")]
    MalformedSegment {
        /// The `key[index]` segment that failed.
        segment: String,
    },

    /// Nesting exceeded the configured maximum depth.
    #[error("depth limit exceeded: {depth} > {max_depth}")]
    DepthLimitExceeded {
        /// Depth reached when the limit tripped.
        depth: usize,
        /// The configured maximum.
        max_depth: usize,
    },

    /// A repair strategy failed; the cascade moves on to the next one.
    #[error("{strategy}: {message}")]
    Strategy {
        /// Name of the strategy that failed.
        strategy: &'static str,
        /// Why it failed.
        message: String,
    },
}

impl MendError {
    /// Creates a strategy failure error.
    #[inline]
    pub fn strategy(strategy: &'static str, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy,
            message: message.into(),
        }
    }

    /// Returns true if this error should trigger the partial-fallback phase
    /// of path resolution (a not-found condition, as opposed to bad input).
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. } | Self::MalformedSegment { .. } | Self::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_error_display() {
        let err = MendError::strategy("strict", "unexpected token");
        assert_eq!(err.to_string(), "strict: unexpected token");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(MendError::KeyNotFound {
            segment: "a".into()
        }
        .is_not_found());
        assert!(MendError::MalformedSegment {
            segment: "a[9]".into()
        }
        .is_not_found());
        assert!(!MendError::EmptyInput.is_not_found());
        assert!(!MendError::InvalidJson("eof".into()).is_not_found());
    }
}
