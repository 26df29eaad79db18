//! Escrow Staking Core Library
//!
//! Shared primitives for the staking engine: 256-bit checked token
//! amounts, identifiers, time helpers and economic constants.

pub mod constants;
pub mod math;
pub mod types;

pub use math::{Amount, MathError, MathResult};
pub use types::{days_between, days_to_seconds, Address, StakeId, Timestamp};

use primitive_types::U256;

/// Fixed-point scale (10^18)
pub fn scale() -> Amount {
    Amount::new(U256::exp10(constants::SCALE_DECIMALS))
}

pub fn max_supply() -> Amount {
    Amount::from_tokens(constants::MAX_SUPPLY_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_constants() {
        assert_eq!(constants::SECONDS_PER_DAY, 86_400);
        assert_eq!(constants::GRACE_PERIOD_SECONDS, 14 * 86_400);
        assert_eq!(
            constants::PENALTY_BURN_PERCENT + constants::PENALTY_POOL_PERCENT,
            75
        );
        assert_eq!(scale(), Amount::from_tokens(1));
    }
}
