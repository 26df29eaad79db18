//! Early and late unstake penalties
//!
//! A stake closed before its end time forfeits part of its reward (never its
//! principal). A stake left open past the grace window decays linearly, and
//! that decay can reach the principal. The combined penalty never exceeds
//! `principal + reward`.

use serde::{Deserialize, Serialize};
use stake_core::constants::{
    GRACE_PERIOD_SECONDS, LATE_PENALTY_DENOMINATOR, LATE_PENALTY_RATE_PER_DAY,
    SHORT_STAKE_PENALTY_DAYS, SHORT_STAKE_THRESHOLD_DAYS,
};
use stake_core::{days_between, Amount, Timestamp};

use crate::error::{EconomicsError, Result};

/// Where an unstake falls relative to the stake's committed end time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StakeTiming {
    /// Before the end time
    Early,
    /// Between the end time and the end of the grace window (inclusive)
    OnTime,
    /// After the grace window
    Late,
}

impl StakeTiming {
    pub fn classify(end_time: Timestamp, now: Timestamp) -> Self {
        if now < end_time {
            StakeTiming::Early
        } else if now > end_time.saturating_add(GRACE_PERIOD_SECONDS) {
            StakeTiming::Late
        } else {
            StakeTiming::OnTime
        }
    }
}

/// The stake fields the penalty formulas read
#[derive(Debug, Clone, Copy)]
pub struct PenaltyInput {
    pub principal: Amount,
    pub reward: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub days_committed: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PenaltyBreakdown {
    pub timing: StakeTiming,
    pub early_penalty: Amount,
    pub late_penalty: Amount,
    pub total_penalty: Amount,
    /// `principal + reward - total_penalty`
    pub payout: Amount,
}

#[derive(Debug, Clone, Copy)]
pub struct PenaltyEngine {
    early_penalty_percent: u64,
}

impl Default for PenaltyEngine {
    fn default() -> Self {
        Self {
            early_penalty_percent: 100,
        }
    }
}

impl PenaltyEngine {
    pub fn new(early_penalty_percent: u64) -> Result<Self> {
        if early_penalty_percent > 100 {
            return Err(EconomicsError::InvalidParameter(format!(
                "early penalty percent must be <= 100, got {}",
                early_penalty_percent
            )));
        }
        Ok(Self {
            early_penalty_percent,
        })
    }

    pub fn early_penalty_percent(&self) -> u64 {
        self.early_penalty_percent
    }

    /// Elapsed-day threshold at which the whole reward is forfeited
    pub fn forfeiture_threshold(days_committed: u64) -> u64 {
        if days_committed < SHORT_STAKE_THRESHOLD_DAYS {
            SHORT_STAKE_PENALTY_DAYS
        } else {
            days_committed / 2
        }
    }

    /// Uncapped early penalty. Below the threshold it grows as elapsed time
    /// shrinks and can exceed the reward.
    pub fn raw_early_penalty(
        reward: Amount,
        days_committed: u64,
        days_elapsed: u64,
    ) -> Result<Amount> {
        let threshold = Self::forfeiture_threshold(days_committed);

        let penalty = if days_elapsed == 0 {
            Amount::ZERO
        } else if days_elapsed < threshold {
            reward.mul_div_u64(threshold, days_elapsed)?
        } else if days_elapsed == threshold {
            reward
        } else {
            reward.checked_div_u64(days_elapsed)?.checked_mul_u64(threshold)?
        };

        Ok(penalty)
    }

    /// Early penalty scaled by the configured percentage and capped at the reward
    pub fn early_penalty(&self, input: &PenaltyInput, now: Timestamp) -> Result<Amount> {
        let days_elapsed = days_between(input.start_time, now);
        let raw = Self::raw_early_penalty(input.reward, input.days_committed, days_elapsed)?;
        let scaled = raw.mul_div_u64(self.early_penalty_percent, 100)?;

        Ok(scaled.min(input.reward))
    }

    /// Linear decay of `amount` per day late past the grace window, capped at `amount`
    pub fn late_penalty(amount: Amount, end_time: Timestamp, now: Timestamp) -> Result<Amount> {
        let grace_end = end_time.saturating_add(GRACE_PERIOD_SECONDS);
        let days_late = days_between(grace_end, now);
        if days_late == 0 {
            return Ok(Amount::ZERO);
        }

        let penalty = amount
            .mul_div_u64(LATE_PENALTY_RATE_PER_DAY, LATE_PENALTY_DENOMINATOR)?
            .checked_mul_u64(days_late)?;

        Ok(penalty.min(amount))
    }

    /// Full penalty assessment for an unstake at `now`
    pub fn assess(&self, input: &PenaltyInput, now: Timestamp) -> Result<PenaltyBreakdown> {
        let timing = StakeTiming::classify(input.end_time, now);
        let gross = input.principal.checked_add(input.reward)?;

        let early_penalty = match timing {
            StakeTiming::Early => self.early_penalty(input, now)?,
            _ => Amount::ZERO,
        };

        let remaining = gross.checked_sub(early_penalty)?;
        let late_penalty = match timing {
            StakeTiming::Late => Self::late_penalty(remaining, input.end_time, now)?,
            _ => Amount::ZERO,
        };

        let total_penalty = early_penalty.checked_add(late_penalty)?.min(gross);
        let payout = gross.checked_sub(total_penalty)?;

        log::debug!(
            "Penalty assessment: timing={:?} early={} late={} payout={}",
            timing,
            early_penalty,
            late_penalty,
            payout
        );

        Ok(PenaltyBreakdown {
            timing,
            early_penalty,
            late_penalty,
            total_penalty,
            payout,
        })
    }
}
