//! Staking engine error types
//!
//! Every variant is a local validation failure scoped to one operation; the
//! operation is rejected as a whole and may be resubmitted with corrected
//! input.

use economics::EconomicsError;
use stake_core::{Amount, MathError, StakeId};
use thiserror::Error;
use treasury::TreasuryError;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum StakingError {
    #[error("Invalid amount: {amount} outside [{min}, {max}]")]
    InvalidAmount { amount: Amount, min: Amount, max: Amount },

    #[error("Invalid duration: {days} days outside [{min}, {max}]")]
    InvalidDuration { days: u64, min: u64, max: u64 },

    #[error("Stake {stake_id} not found for {account}")]
    StakeNotFound { account: String, stake_id: StakeId },

    #[error("Invalid stake index {index} for {account} ({count} open stakes)")]
    InvalidStakeIndex {
        account: String,
        index: usize,
        count: usize,
    },

    #[error("Insufficient treasury: required {required}, available {available}")]
    InsufficientTreasury { required: Amount, available: Amount },

    #[error("Staking is paused")]
    StakingPaused,

    #[error("No rewards available for {0}")]
    NoRewardsAvailable(String),

    #[error("Invalid percentage: {0} ppm")]
    InvalidPercentage(u64),

    #[error("Unauthorized: {0} is not the pool owner")]
    Unauthorized(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Economics error: {0}")]
    Economics(#[from] EconomicsError),

    #[error("Token error: {0}")]
    Token(#[from] TreasuryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, StakingError>;
