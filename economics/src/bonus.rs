//! Quantity and time bonus curves
//!
//! Both bonuses are additive terms on top of a stake's principal and feed the
//! stake's C-Share weight. All divisions truncate.

use serde::{Deserialize, Serialize};
use stake_core::constants::{
    MAX_TIME_BONUS_DAYS, QUANTITY_BONUS_CAP_TOKENS, QUANTITY_BONUS_DIVISOR_TOKENS,
    TIME_BONUS_DIVISOR,
};
use stake_core::Amount;

use crate::error::Result;

/// Behaviour of the quantity bonus once principal exceeds the cap.
///
/// Two staking contract variants disagree here, so both are available and the
/// pool configuration picks one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BonusPolicy {
    /// Above the cap the bonus becomes a flat 10% of principal
    FlatTenPercent,
    /// Above the cap the bonus is frozen at its value for a principal equal to the cap
    #[default]
    ClampAtCap,
}

pub fn quantity_bonus_cap() -> Amount {
    Amount::from_tokens(QUANTITY_BONUS_CAP_TOKENS)
}

pub fn quantity_bonus_divisor() -> Amount {
    Amount::from_tokens(QUANTITY_BONUS_DIVISOR_TOKENS)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusBreakdown {
    pub quantity_bonus: Amount,
    pub time_bonus: Amount,
}

impl BonusBreakdown {
    pub fn total(&self) -> Result<Amount> {
        Ok(self.quantity_bonus.checked_add(self.time_bonus)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BonusCalculator {
    policy: BonusPolicy,
}

impl BonusCalculator {
    pub fn new(policy: BonusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BonusPolicy {
        self.policy
    }

    /// `principal * principal / DIVISOR` up to the cap (10% of principal at the cap)
    pub fn quantity_bonus(&self, principal: Amount) -> Result<Amount> {
        let cap = quantity_bonus_cap();
        let divisor = quantity_bonus_divisor();

        if principal <= cap {
            return Ok(principal.mul_div(principal, divisor)?);
        }

        match self.policy {
            BonusPolicy::FlatTenPercent => Ok(principal.checked_div_u64(10)?),
            BonusPolicy::ClampAtCap => Ok(cap.mul_div(cap, divisor)?),
        }
    }

    /// Zero for one-day stakes, linear in `(days - 1) / 1820` up to ~10 years,
    /// flat beyond that.
    pub fn time_bonus(&self, principal: Amount, days_committed: u64) -> Result<Amount> {
        if days_committed <= 1 {
            return Ok(Amount::ZERO);
        }

        let bonus_days = days_committed.min(MAX_TIME_BONUS_DAYS) - 1;
        Ok(principal.mul_div_u64(bonus_days, TIME_BONUS_DIVISOR)?)
    }

    pub fn bonuses(&self, principal: Amount, days_committed: u64) -> Result<BonusBreakdown> {
        Ok(BonusBreakdown {
            quantity_bonus: self.quantity_bonus(principal)?,
            time_bonus: self.time_bonus(principal, days_committed)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_core::max_supply;

    #[test]
    fn test_quantity_bonus_below_cap() {
        let calc = BonusCalculator::default();
        // 15M tokens: 15M * 15M / 1.5B = 150k tokens (1%)
        let bonus = calc.quantity_bonus(Amount::from_tokens(15_000_000)).unwrap();
        assert_eq!(bonus, Amount::from_tokens(150_000));
    }

    #[test]
    fn test_quantity_bonus_at_cap_is_ten_percent() {
        let cap = quantity_bonus_cap();
        for policy in [BonusPolicy::FlatTenPercent, BonusPolicy::ClampAtCap] {
            let bonus = BonusCalculator::new(policy).quantity_bonus(cap).unwrap();
            assert_eq!(bonus, Amount::from_tokens(15_000_000));
        }
    }

    #[test]
    fn test_quantity_bonus_policies_diverge_above_cap() {
        let principal = Amount::from_tokens(300_000_000);

        let flat = BonusCalculator::new(BonusPolicy::FlatTenPercent)
            .quantity_bonus(principal)
            .unwrap();
        let clamped = BonusCalculator::new(BonusPolicy::ClampAtCap)
            .quantity_bonus(principal)
            .unwrap();

        assert_eq!(flat, Amount::from_tokens(30_000_000));
        assert_eq!(clamped, Amount::from_tokens(15_000_000));
    }

    #[test]
    fn test_time_bonus_curve() {
        let calc = BonusCalculator::default();
        let principal = Amount::from_tokens(1_820);

        assert_eq!(calc.time_bonus(principal, 0).unwrap(), Amount::ZERO);
        assert_eq!(calc.time_bonus(principal, 1).unwrap(), Amount::ZERO);
        assert_eq!(calc.time_bonus(principal, 2).unwrap(), Amount::from_tokens(1));
        assert_eq!(calc.time_bonus(principal, 365).unwrap(), Amount::from_tokens(364));
        // Flat 2x beyond the cap
        assert_eq!(
            calc.time_bonus(principal, MAX_TIME_BONUS_DAYS).unwrap(),
            Amount::from_tokens(3_640)
        );
        assert_eq!(
            calc.time_bonus(principal, 5_555).unwrap(),
            Amount::from_tokens(3_640)
        );
    }

    #[test]
    fn test_no_overflow_at_max_supply() {
        let calc = BonusCalculator::new(BonusPolicy::FlatTenPercent);
        let bonuses = calc.bonuses(max_supply(), 10_000).unwrap();
        assert!(bonuses.total().is_ok());
    }
}
