//! Distribution of collected penalties

use serde::{Deserialize, Serialize};
use stake_core::constants::{PENALTY_BURN_PERCENT, PENALTY_POOL_PERCENT};
use stake_core::Amount;

use crate::error::Result;

/// How a collected penalty leaves the pool account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyDistribution {
    /// The whole penalty stays in the pool account
    #[default]
    Retain,
    /// Burn 25%, retain 50%, send the rest to the treasury account
    Split,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PenaltySplit {
    pub burn: Amount,
    pub pool: Amount,
    pub treasury: Amount,
}

impl PenaltySplit {
    /// Treasury takes the remainder so rounding dust is never lost
    pub fn three_way(penalty: Amount) -> Result<Self> {
        let burn = penalty.mul_div_u64(PENALTY_BURN_PERCENT, 100)?;
        let pool = penalty.mul_div_u64(PENALTY_POOL_PERCENT, 100)?;
        let treasury = penalty.checked_sub(burn)?.checked_sub(pool)?;

        Ok(Self {
            burn,
            pool,
            treasury,
        })
    }

    pub fn retained(penalty: Amount) -> Self {
        Self {
            burn: Amount::ZERO,
            pool: penalty,
            treasury: Amount::ZERO,
        }
    }

    pub fn total(&self) -> Result<Amount> {
        Ok(self.burn.checked_add(self.pool)?.checked_add(self.treasury)?)
    }
}

impl PenaltyDistribution {
    pub fn split(&self, penalty: Amount) -> Result<PenaltySplit> {
        match self {
            PenaltyDistribution::Retain => Ok(PenaltySplit::retained(penalty)),
            PenaltyDistribution::Split => PenaltySplit::three_way(penalty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_way_split() {
        let split = PenaltySplit::three_way(Amount::from(1_000u64)).unwrap();
        assert_eq!(split.burn, Amount::from(250u64));
        assert_eq!(split.pool, Amount::from(500u64));
        assert_eq!(split.treasury, Amount::from(250u64));
    }

    #[test]
    fn test_treasury_absorbs_dust() {
        let split = PenaltySplit::three_way(Amount::from(7u64)).unwrap();
        // 7 * 25 / 100 = 1, 7 * 50 / 100 = 3
        assert_eq!(split.burn, Amount::from(1u64));
        assert_eq!(split.pool, Amount::from(3u64));
        assert_eq!(split.treasury, Amount::from(3u64));
        assert_eq!(split.total().unwrap(), Amount::from(7u64));
    }

    #[test]
    fn test_retain_keeps_everything() {
        let split = PenaltyDistribution::Retain
            .split(Amount::from(99u64))
            .unwrap();
        assert_eq!(split.pool, Amount::from(99u64));
        assert!(split.burn.is_zero() && split.treasury.is_zero());
    }
}
