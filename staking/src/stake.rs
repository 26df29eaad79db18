//! A single principal deposit committed for a fixed number of days

use serde::{Deserialize, Serialize};
use stake_core::{days_between, days_to_seconds, Address, Amount, StakeId, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stake {
    pub id: StakeId,
    pub owner: Address,
    pub principal: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub days_committed: u64,
    /// Last checkpoint; never moves backwards and never passes `end_time`
    pub last_accrual_time: Timestamp,
    /// Reward earned at past checkpoints and not yet paid
    pub accrued_reward: Amount,
}

impl Stake {
    pub fn new(
        id: StakeId,
        owner: Address,
        principal: Amount,
        days_committed: u64,
        now: Timestamp,
    ) -> Self {
        Stake {
            id,
            owner,
            principal,
            start_time: now,
            end_time: now.saturating_add(days_to_seconds(days_committed)),
            days_committed,
            last_accrual_time: now,
            accrued_reward: Amount::ZERO,
        }
    }

    /// Accrual stops at the committed end time
    pub fn accrual_horizon(&self, now: Timestamp) -> Timestamp {
        now.min(self.end_time)
    }

    /// Seconds of reward not yet folded into `accrued_reward`
    pub fn unaccrued_seconds(&self, now: Timestamp) -> u64 {
        self.accrual_horizon(now)
            .saturating_sub(self.last_accrual_time)
    }

    /// Whole days served, not counting time past the end
    pub fn days_served(&self, now: Timestamp) -> u64 {
        days_between(self.start_time, self.accrual_horizon(now))
    }

    pub fn is_matured(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }
}
