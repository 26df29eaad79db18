//! Pool state captured together with the token ledger it ran against

use serde::{Deserialize, Serialize};
use stake_core::{Amount, Timestamp};
use staking::StakingPool;
use treasury::{InMemoryToken, TokenLedger};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub taken_at: Timestamp,
    pub pool: StakingPool,
    pub token: InMemoryToken,
}

/// Headline figures of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub taken_at: Timestamp,
    pub total_staked: Amount,
    pub total_users: u64,
    pub total_paid: Amount,
    pub cshare_rate: Amount,
    pub open_stakes: usize,
    pub token_supply: Amount,
    pub pool_reserve: Amount,
    pub treasury_balance: Amount,
    pub events: usize,
}

impl PoolSnapshot {
    pub fn new(pool: StakingPool, token: InMemoryToken, taken_at: Timestamp) -> Self {
        Self {
            taken_at,
            pool,
            token,
        }
    }

    pub fn summary(&self) -> SnapshotSummary {
        let config = self.pool.config();
        SnapshotSummary {
            taken_at: self.taken_at,
            total_staked: self.pool.total_staked(),
            total_users: self.pool.total_users(),
            total_paid: self.pool.total_paid(),
            cshare_rate: self.pool.cshare_rate(),
            open_stakes: self.pool.ledger().len(),
            token_supply: self.token.total_supply(),
            pool_reserve: self.token.balance_of(&config.pool_account),
            treasury_balance: self.token.balance_of(&config.treasury_account),
            events: self.pool.journal().len(),
        }
    }
}
