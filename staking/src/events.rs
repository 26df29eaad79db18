//! Receipts and journal events emitted by pool operations

use economics::StakeTiming;
use serde::{Deserialize, Serialize};
use stake_core::{Address, Amount, StakeId, Timestamp};
use treasury::PenaltySplit;

use crate::error::Result;

/// Outcome of closing one stake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnstakeReceipt {
    pub stake_id: StakeId,
    pub account: Address,
    pub principal: Amount,
    pub days_committed: u64,
    pub days_served: u64,
    pub timing: StakeTiming,
    /// Gross reward before penalties
    pub reward: Amount,
    pub early_penalty: Amount,
    pub late_penalty: Amount,
    pub total_penalty: Amount,
    pub penalty_split: PenaltySplit,
    /// `principal + reward - total_penalty`
    pub payout: Amount,
    pub principal_paid: Amount,
    pub reward_paid: Amount,
    /// C-Share weight of the stake at close
    pub cshares: Amount,
    pub cshare_rate_updated: bool,
}

impl UnstakeReceipt {
    /// Net amount the close takes out of the pool reserve.
    ///
    /// The principal is re-minted into the pool account before anything leaves
    /// it, and the pool's share of the penalty never leaves at all.
    pub fn reserve_draw(&self) -> Result<Amount> {
        let outflow = self
            .payout
            .checked_add(self.penalty_split.burn)?
            .checked_add(self.penalty_split.treasury)?;
        Ok(outflow.saturating_sub(self.principal))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributionPayout {
    pub account: Address,
    pub cshares: Amount,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistributionReport {
    pub percentage_ppm: u64,
    pub daily_pool: Amount,
    pub total_cshares: Amount,
    pub distributed: Amount,
    /// Truncation remainder left in the pool account
    pub dust: Amount,
    pub payouts: Vec<DistributionPayout>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StakingEvent {
    Staked {
        stake_id: StakeId,
        account: Address,
        principal: Amount,
        days_committed: u64,
        timestamp: Timestamp,
    },
    Unstaked {
        receipt: UnstakeReceipt,
        timestamp: Timestamp,
    },
    RewardsClaimed {
        account: Address,
        amount: Amount,
        timestamp: Timestamp,
    },
    RewardsDistributed {
        daily_pool: Amount,
        distributed: Amount,
        recipients: usize,
        timestamp: Timestamp,
    },
    CShareRateUpdated {
        rate: Amount,
        timestamp: Timestamp,
    },
    ConfigUpdated {
        field: String,
        value: String,
    },
}
