//! Single-writer access to a pool and its token ledger
//!
//! All operations run under one lock against staged copies of the pool and
//! token state; the copies replace the live state only when the operation
//! returns `Ok`. A failed or panicking operation leaves nothing behind.
//!
//! The staged pool starts with an empty journal and treasury trail, so the
//! cost of a transaction does not grow with the pool's history. Entries it
//! records are appended to the live logs on commit.

use parking_lot::Mutex;
use stake_core::{Amount, StakeId, Timestamp};
use treasury::TokenLedger;

use crate::error::Result;
use crate::events::{DistributionReport, UnstakeReceipt};
use crate::pool::StakingPool;

struct PoolState<T> {
    pool: StakingPool,
    token: T,
}

pub struct SharedPool<T: TokenLedger + Clone> {
    state: Mutex<PoolState<T>>,
}

impl<T: TokenLedger + Clone> SharedPool<T> {
    pub fn new(pool: StakingPool, token: T) -> Self {
        Self {
            state: Mutex::new(PoolState { pool, token }),
        }
    }

    /// Run `op` atomically: commit on `Ok`, discard on `Err`
    pub fn transaction<R, F>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&mut StakingPool, &mut T) -> Result<R>,
    {
        let mut state = self.state.lock();
        let mut pool = state.pool.staged();
        let mut token = state.token.clone();

        let result = op(&mut pool, &mut token)?;

        state.pool.commit(pool);
        state.token = token;
        Ok(result)
    }

    /// Read-only access under the same lock
    pub fn read<R, F>(&self, view: F) -> R
    where
        F: FnOnce(&StakingPool, &T) -> R,
    {
        let state = self.state.lock();
        view(&state.pool, &state.token)
    }

    pub fn stake(&self, account: &str, amount: Amount, days: u64, now: Timestamp) -> Result<StakeId> {
        self.transaction(|pool, token| pool.stake(token, account, amount, days, now))
    }

    pub fn unstake(&self, account: &str, stake_id: StakeId, now: Timestamp) -> Result<UnstakeReceipt> {
        self.transaction(|pool, token| pool.unstake(token, account, stake_id, now))
    }

    pub fn unstake_specific(
        &self,
        account: &str,
        index: usize,
        now: Timestamp,
    ) -> Result<UnstakeReceipt> {
        self.transaction(|pool, token| pool.unstake_specific(token, account, index, now))
    }

    pub fn claim_rewards(&self, account: &str, now: Timestamp) -> Result<Amount> {
        self.transaction(|pool, token| pool.claim_rewards(token, account, now))
    }

    pub fn distribute_daily_rewards(
        &self,
        percentage_ppm: Option<u64>,
        now: Timestamp,
    ) -> Result<DistributionReport> {
        self.transaction(|pool, token| pool.distribute_daily_rewards(token, percentage_ppm, now))
    }

    pub fn into_inner(self) -> (StakingPool, T) {
        let state = self.state.into_inner();
        (state.pool, state.token)
    }
}
