//! Time-prorated reward accrual
//!
//! The pool emits `reward_rate_per_second` tokens, shared in proportion to
//! each stake's principal over the current `total_staked`:
//!
//! ```text
//! reward_per_second = rate * principal * SCALE / total_staked
//! pending           = elapsed * reward_per_second / SCALE + accrued
//! ```

use economics::BonusCalculator;
use stake_core::{scale, Amount, Timestamp};

use crate::error::Result;
use crate::stake::Stake;

#[derive(Debug, Clone, Copy)]
pub struct RewardAccrual {
    reward_rate_per_second: Amount,
}

impl RewardAccrual {
    pub fn new(reward_rate_per_second: Amount) -> Self {
        Self {
            reward_rate_per_second,
        }
    }

    pub fn reward_rate_per_second(&self) -> Amount {
        self.reward_rate_per_second
    }

    /// Scaled by 10^18; zero when nothing is staked
    pub fn reward_per_second(&self, principal: Amount, total_staked: Amount) -> Result<Amount> {
        if total_staked.is_zero() {
            return Ok(Amount::ZERO);
        }
        let scaled = self
            .reward_rate_per_second
            .checked_mul(principal)?
            .checked_mul(scale())?;
        Ok(scaled.checked_div(total_staked)?)
    }

    /// Accrued reward plus whatever has built up since the last checkpoint
    pub fn pending_reward(
        &self,
        stake: &Stake,
        total_staked: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        if total_staked.is_zero() {
            return Ok(Amount::ZERO);
        }

        let elapsed = stake.unaccrued_seconds(now);
        let per_second = self.reward_per_second(stake.principal, total_staked)?;
        let fresh = per_second.mul_div(Amount::from(elapsed), scale())?;

        Ok(fresh.checked_add(stake.accrued_reward)?)
    }

    /// Fold pending reward into the stake and advance its checkpoint.
    /// Calling twice at the same timestamp is a no-op.
    pub fn checkpoint(
        &self,
        stake: &mut Stake,
        total_staked: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        let pending = self.pending_reward(stake, total_staked, now)?;
        stake.accrued_reward = pending;
        stake.last_accrual_time = stake.last_accrual_time.max(stake.accrual_horizon(now));

        log::debug!(
            "Checkpointed stake {}: accrued {} at {}",
            stake.id,
            pending,
            stake.last_accrual_time
        );
        Ok(pending)
    }

    /// C-Share weight: pending reward plus quantity and time bonuses
    pub fn cshares(
        &self,
        stake: &Stake,
        total_staked: Amount,
        bonuses: &BonusCalculator,
        now: Timestamp,
    ) -> Result<Amount> {
        let pending = self.pending_reward(stake, total_staked, now)?;
        let bonus = bonuses
            .bonuses(stake.principal, stake.days_committed)?
            .total()?;
        Ok(pending.checked_add(bonus)?)
    }
}
