//! Escrow Staking Economics Module
//!
//! Pure calculations used by the staking engine:
//! - Quantity and time bonus curves
//! - Early/late unstake penalties
//! - The monotonic C-Share rate oracle

pub mod bonus;
pub mod cshare;
pub mod error;
pub mod penalty;

pub use bonus::{BonusBreakdown, BonusCalculator, BonusPolicy};
pub use cshare::{CShareRateOracle, CShareSample};
pub use error::{EconomicsError, Result};
pub use penalty::{PenaltyBreakdown, PenaltyEngine, PenaltyInput, StakeTiming};
