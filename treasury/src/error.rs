//! Treasury error types

use stake_core::{Amount, MathError};
use thiserror::Error;

/// Treasury and token ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("Insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: String,
        requested: Amount,
        available: Amount,
    },

    #[error("Unauthorized withdrawal attempt by {0}")]
    UnauthorizedWithdrawal(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Milestone not reached: {0}")]
    MilestoneNotReached(String),

    #[error("Supply cap exceeded: minting {requested} would exceed {cap}")]
    SupplyCapExceeded { requested: Amount, cap: Amount },

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

pub type Result<T> = std::result::Result<T, TreasuryError>;
