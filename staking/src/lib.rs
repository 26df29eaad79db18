//! Escrow Staking Engine
//!
//! Multi-stake-per-account staking with time-prorated rewards, quantity and
//! time bonuses, early/late unstake penalties and a monotonic C-Share rate.
//!
//! Time is always an explicit input: every operation takes `now`, so a pool
//! can be replayed deterministically from any sequence of timestamps.

pub mod accrual;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod pool;
pub mod registry;
pub mod shared;
pub mod stake;

pub use accrual::RewardAccrual;
pub use config::{ConfigError, StakingConfig};
pub use error::{Result, StakingError};
pub use events::{DistributionPayout, DistributionReport, StakingEvent, UnstakeReceipt};
pub use ledger::StakeLedger;
pub use pool::StakingPool;
pub use registry::ActiveUserRegistry;
pub use shared::SharedPool;
pub use stake::Stake;

pub use economics::{BonusPolicy, StakeTiming};
pub use stake_core::{Address, Amount, StakeId, Timestamp};
pub use treasury::{InMemoryToken, PenaltyDistribution, TokenLedger};
