//! Global C-Share exchange rate
//!
//! Each closed stake is a sample point for a candidate rate. The stored rate
//! only moves up.

use serde::{Deserialize, Serialize};
use stake_core::constants::{INITIAL_CSHARE_RATE, MAX_TIME_BONUS_DAYS, TIME_BONUS_DIVISOR};
use stake_core::{scale, Amount};

use crate::bonus::{quantity_bonus_cap, quantity_bonus_divisor};
use crate::error::Result;

/// Sample taken from a stake at the moment it is closed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CShareSample {
    /// Reward paid out for the stake
    pub total_paid: Amount,
    /// The stake's C-Share weight at close
    pub shares: Amount,
    pub days_staked: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CShareRateOracle {
    rate: Amount,
}

impl Default for CShareRateOracle {
    fn default() -> Self {
        Self::new(Amount::from(INITIAL_CSHARE_RATE))
    }
}

impl CShareRateOracle {
    pub fn new(initial_rate: Amount) -> Self {
        Self { rate: initial_rate }
    }

    pub fn rate(&self) -> Amount {
        self.rate
    }

    /// `((QD + min(paid, QCAP)) * paid) / (((TD * shares) / (TD + min(days, TCAP) - 1)) * (QD / SCALE))`
    ///
    /// Returns `None` when the sample carries no information (nothing paid or
    /// a zero denominator).
    pub fn candidate_rate(sample: &CShareSample) -> Result<Option<Amount>> {
        if sample.total_paid.is_zero() {
            return Ok(None);
        }

        let quantity_divisor = quantity_bonus_divisor();
        let numerator = quantity_divisor
            .checked_add(sample.total_paid.min(quantity_bonus_cap()))?
            .checked_mul(sample.total_paid)?;

        let time_divisor = Amount::from(TIME_BONUS_DIVISOR);
        let time_weight = TIME_BONUS_DIVISOR + sample.days_staked.min(MAX_TIME_BONUS_DAYS) - 1;
        let time_adjusted_shares = time_divisor
            .checked_mul(sample.shares)?
            .checked_div_u64(time_weight)?;
        let denominator = time_adjusted_shares.checked_mul(quantity_divisor.checked_div(scale())?)?;

        if denominator.is_zero() {
            return Ok(None);
        }

        Ok(Some(numerator.checked_div(denominator)?))
    }

    /// Feed a closed stake into the oracle; returns whether the rate moved
    pub fn observe(&mut self, sample: &CShareSample) -> Result<bool> {
        let Some(candidate) = Self::candidate_rate(sample)? else {
            return Ok(false);
        };

        log::debug!(
            "C-Share candidate {} (current {}) from sample paid={} shares={} days={}",
            candidate,
            self.rate,
            sample.total_paid,
            sample.shares,
            sample.days_staked
        );

        if candidate > self.rate {
            self.rate = candidate;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(paid_tokens: u64, share_tokens: u64, days: u64) -> CShareSample {
        CShareSample {
            total_paid: Amount::from_tokens(paid_tokens),
            shares: Amount::from_tokens(share_tokens),
            days_staked: days,
        }
    }

    #[test]
    fn test_zero_paid_gives_no_candidate() {
        let s = sample(0, 1_000, 30);
        assert_eq!(CShareRateOracle::candidate_rate(&s).unwrap(), None);
    }

    #[test]
    fn test_zero_shares_gives_no_candidate() {
        let s = sample(10, 0, 30);
        assert_eq!(CShareRateOracle::candidate_rate(&s).unwrap(), None);
    }

    #[test]
    fn test_candidate_grows_with_paid() {
        let low = CShareRateOracle::candidate_rate(&sample(10, 1_000, 30))
            .unwrap()
            .unwrap();
        let high = CShareRateOracle::candidate_rate(&sample(100, 1_000, 30))
            .unwrap()
            .unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_rate_never_decreases() {
        let mut oracle = CShareRateOracle::new(Amount::ZERO);

        assert!(oracle.observe(&sample(100, 1_000, 30)).unwrap());
        let peak = oracle.rate();

        // A weaker sample must not pull the rate down
        assert!(!oracle.observe(&sample(1, 1_000_000, 30)).unwrap());
        assert_eq!(oracle.rate(), peak);

        let mut last = oracle.rate();
        for (paid, shares, days) in [(5, 50, 1), (500, 10, 3641), (2, 2, 9_999)] {
            oracle.observe(&sample(paid, shares, days)).unwrap();
            assert!(oracle.rate() >= last);
            last = oracle.rate();
        }
    }
}
