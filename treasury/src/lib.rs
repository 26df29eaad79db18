//! Escrow Staking Treasury Module
//!
//! Token-side collaborators of the staking engine:
//! - The [`TokenLedger`] interface and an in-memory implementation
//! - Penalty distribution (burn / pool / treasury)
//! - Treasury bookkeeping with a full audit trail
//! - Vesting schedules for team, marketing and liquidity allocations

pub mod error;
pub mod pool;
pub mod split;
pub mod token;
pub mod vesting;

pub use error::{Result, TreasuryError};
pub use pool::{TreasuryPool, TreasurySource, TreasuryStats, TreasuryTransaction};
pub use split::{PenaltyDistribution, PenaltySplit};
pub use token::{InMemoryToken, TokenLedger};
pub use vesting::VestingSchedule;
