//! Cliff + linear vesting for team, marketing and liquidity allocations

use serde::{Deserialize, Serialize};
use stake_core::{days_between, days_to_seconds, Address, Amount, Timestamp};

use crate::error::{Result, TreasuryError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VestingSchedule {
    beneficiary: Address,
    total: Amount,
    start_time: Timestamp,
    cliff_days: u64,
    duration_days: u64,
    released: Amount,
}

impl VestingSchedule {
    pub fn new(
        beneficiary: impl Into<Address>,
        total: Amount,
        start_time: Timestamp,
        cliff_days: u64,
        duration_days: u64,
    ) -> Result<Self> {
        if total.is_zero() {
            return Err(TreasuryError::InvalidAmount(
                "Vesting total must be positive".to_string(),
            ));
        }
        if duration_days == 0 || cliff_days > duration_days {
            return Err(TreasuryError::InvalidAmount(format!(
                "Invalid vesting window: cliff {} days, duration {} days",
                cliff_days, duration_days
            )));
        }

        Ok(Self {
            beneficiary: beneficiary.into(),
            total,
            start_time,
            cliff_days,
            duration_days,
            released: Amount::ZERO,
        })
    }

    pub fn beneficiary(&self) -> &str {
        &self.beneficiary
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn released(&self) -> Amount {
        self.released
    }

    pub fn cliff_end(&self) -> Timestamp {
        self.start_time.saturating_add(days_to_seconds(self.cliff_days))
    }

    /// Amount vested by `now`, in whole elapsed days
    pub fn vested(&self, now: Timestamp) -> Result<Amount> {
        if now < self.cliff_end() {
            return Ok(Amount::ZERO);
        }

        let elapsed = days_between(self.start_time, now);
        if elapsed >= self.duration_days {
            return Ok(self.total);
        }
        Ok(self.total.mul_div_u64(elapsed, self.duration_days)?)
    }

    pub fn releasable(&self, now: Timestamp) -> Result<Amount> {
        Ok(self.vested(now)?.saturating_sub(self.released))
    }

    pub fn release(&mut self, now: Timestamp) -> Result<Amount> {
        if now < self.cliff_end() {
            return Err(TreasuryError::MilestoneNotReached(format!(
                "cliff for {} ends at {}",
                self.beneficiary,
                self.cliff_end()
            )));
        }

        let amount = self.releasable(now)?;
        if amount.is_zero() {
            return Err(TreasuryError::InvalidAmount(
                "Nothing vested since last release".to_string(),
            ));
        }

        self.released = self.released.checked_add(amount)?;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_core::constants::SECONDS_PER_DAY;

    #[test]
    fn test_cliff_blocks_release() {
        let mut schedule =
            VestingSchedule::new("team", Amount::from(1_000u64), 0, 30, 100).unwrap();
        let err = schedule.release(29 * SECONDS_PER_DAY).unwrap_err();
        assert!(matches!(err, TreasuryError::MilestoneNotReached(_)));
    }

    #[test]
    fn test_linear_release() {
        let mut schedule =
            VestingSchedule::new("team", Amount::from(1_000u64), 0, 30, 100).unwrap();

        assert_eq!(
            schedule.release(30 * SECONDS_PER_DAY).unwrap(),
            Amount::from(300u64)
        );
        assert_eq!(
            schedule.release(50 * SECONDS_PER_DAY).unwrap(),
            Amount::from(200u64)
        );
        assert_eq!(
            schedule.release(400 * SECONDS_PER_DAY).unwrap(),
            Amount::from(500u64)
        );
        assert!(schedule.release(401 * SECONDS_PER_DAY).is_err());
        assert_eq!(schedule.released(), schedule.total());
    }

    #[test]
    fn test_invalid_window() {
        assert!(VestingSchedule::new("team", Amount::from(1u64), 0, 10, 5).is_err());
        assert!(VestingSchedule::new("team", Amount::ZERO, 0, 0, 5).is_err());
    }
}
