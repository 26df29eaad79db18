//! Economics error types

use stake_core::MathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomicsError {
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, EconomicsError>;
