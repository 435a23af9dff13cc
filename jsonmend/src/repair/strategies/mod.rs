//! Repair strategies tried by the cascade, in priority order.

mod literal;
mod normalized;
mod relaxed;
mod strict;
mod tolerant;

pub use literal::LiteralStrategy;
pub use normalized::NormalizeStrategy;
pub use relaxed::RelaxedStrategy;
pub use strict::StrictStrategy;
pub use tolerant::TolerantStrategy;

use serde_json::Value;

use crate::error::Result;

/// Trait for repair strategies that turn near-JSON text into a value.
///
/// Each strategy represents one level of permissiveness. The cascade tries
/// strategies in priority order and stops at the first success; a strategy
/// failure is never fatal, it just moves the cascade along.
pub trait RepairStrategy: Send + Sync + std::fmt::Debug {
    /// Returns the name of this strategy for the repair trace.
    fn name(&self) -> &'static str;

    /// Attempts to parse the input using this strategy.
    fn attempt(&self, input: &str) -> Result<Value>;

    /// Returns the priority of this strategy. Lower values are tried first.
    fn priority(&self) -> u8;
}

/// Returns the default strategy list, sorted by priority:
/// 1. [`StrictStrategy`] - already-valid JSON
/// 2. [`NormalizeStrategy`] - textual normalization, then parse
/// 3. [`TolerantStrategy`] - native comment/trailing-comma tolerance
/// 4. [`RelaxedStrategy`] - maximally permissive decoding
/// 5. [`LiteralStrategy`] - restricted literal-structure evaluation
pub fn default_strategies(max_depth: usize) -> Vec<Box<dyn RepairStrategy>> {
    let mut strategies: Vec<Box<dyn RepairStrategy>> = vec![
        Box::new(StrictStrategy),
        Box::new(NormalizeStrategy),
        Box::new(TolerantStrategy::new(max_depth)),
        Box::new(RelaxedStrategy::new(max_depth)),
        Box::new(LiteralStrategy::new(max_depth)),
    ];

    strategies.sort_by_key(|s| s.priority());
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_order() {
        let strategies = default_strategies(64);
        let names: Vec<_> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["strict", "normalize", "tolerant", "relaxed", "literal"]
        );
    }

    #[test]
    fn test_strict_priority_is_first() {
        let strategy = StrictStrategy;
        assert_eq!(strategy.priority(), 1);
    }
}
