//! Identifier and time types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SECONDS_PER_DAY;

/// Account address (opaque string, e.g. a hex account or an alias)
pub type Address = String;

/// Seconds since the Unix epoch; always injected by the caller
pub type Timestamp = u64;

/// Stable identifier of a stake, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StakeId(pub u64);

impl StakeId {
    pub fn next(self) -> StakeId {
        StakeId(self.0 + 1)
    }
}

impl fmt::Display for StakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whole days elapsed between two timestamps (0 if `to` precedes `from`)
pub fn days_between(from: Timestamp, to: Timestamp) -> u64 {
    to.saturating_sub(from) / SECONDS_PER_DAY
}

pub fn days_to_seconds(days: u64) -> u64 {
    days.saturating_mul(SECONDS_PER_DAY)
}
