//! Treasury account bookkeeping
//!
//! Mirrors the treasury account's token balance with a complete audit trail:
//! every penalty share received and every withdrawal (e.g. vesting releases)
//! is recorded with the resulting balance.

use serde::{Deserialize, Serialize};
use stake_core::{Address, Amount, StakeId, Timestamp};

use crate::error::{Result, TreasuryError};
use crate::vesting::VestingSchedule;

/// Origin of funds entering the treasury
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TreasurySource {
    /// Treasury's share of an unstake penalty
    PenaltyShare { stake_id: StakeId },
    /// Direct allocation (team, marketing, liquidity)
    Allocation { from: Address },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TreasuryTransaction {
    Deposit {
        source: TreasurySource,
        amount: Amount,
        timestamp: Timestamp,
        balance_after: Amount,
    },
    Withdrawal {
        recipient: Address,
        amount: Amount,
        reason: String,
        timestamp: Timestamp,
        balance_after: Amount,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreasuryStats {
    pub balance: Amount,
    pub total_received: Amount,
    pub total_from_penalties: Amount,
    pub total_withdrawn: Amount,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryPool {
    account: Address,
    balance: Amount,
    total_received: Amount,
    total_from_penalties: Amount,
    total_withdrawn: Amount,
    transactions: Vec<TreasuryTransaction>,
}

impl TreasuryPool {
    pub fn new(account: impl Into<Address>) -> Self {
        Self {
            account: account.into(),
            balance: Amount::ZERO,
            total_received: Amount::ZERO,
            total_from_penalties: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
            transactions: Vec::new(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn transactions(&self) -> &[TreasuryTransaction] {
        &self.transactions
    }

    pub fn deposit(
        &mut self,
        source: TreasurySource,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Result<()> {
        if amount.is_zero() {
            return Err(TreasuryError::InvalidAmount(
                "Deposit amount must be positive".to_string(),
            ));
        }

        let balance = self.balance.checked_add(amount)?;
        let total_received = self.total_received.checked_add(amount)?;
        let total_from_penalties = match source {
            TreasurySource::PenaltyShare { .. } => self.total_from_penalties.checked_add(amount)?,
            TreasurySource::Allocation { .. } => self.total_from_penalties,
        };

        self.balance = balance;
        self.total_received = total_received;
        self.total_from_penalties = total_from_penalties;
        self.transactions.push(TreasuryTransaction::Deposit {
            source,
            amount,
            timestamp,
            balance_after: balance,
        });

        log::debug!("Treasury {} received {} (balance {})", self.account, amount, balance);
        Ok(())
    }

    pub fn withdraw(
        &mut self,
        recipient: impl Into<Address>,
        amount: Amount,
        reason: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<()> {
        if amount > self.balance {
            return Err(TreasuryError::InsufficientBalance {
                account: self.account.clone(),
                requested: amount,
                available: self.balance,
            });
        }

        let balance = self.balance.checked_sub(amount)?;
        self.total_withdrawn = self.total_withdrawn.checked_add(amount)?;
        self.balance = balance;
        self.transactions.push(TreasuryTransaction::Withdrawal {
            recipient: recipient.into(),
            amount,
            reason: reason.into(),
            timestamp,
            balance_after: balance,
        });
        Ok(())
    }

    /// Release whatever `schedule` has vested to its beneficiary
    pub fn release_vested(
        &mut self,
        schedule: &mut VestingSchedule,
        timestamp: Timestamp,
    ) -> Result<Amount> {
        let amount = schedule.releasable(timestamp)?;
        if amount > self.balance {
            return Err(TreasuryError::InsufficientBalance {
                account: self.account.clone(),
                requested: amount,
                available: self.balance,
            });
        }

        let released = schedule.release(timestamp)?;
        let reason = format!("vesting release for {}", schedule.beneficiary());
        self.withdraw(schedule.beneficiary().to_string(), released, reason, timestamp)?;
        Ok(released)
    }

    /// Copy of the balances with an empty audit trail, for staged updates
    pub fn staged(&self) -> Self {
        Self {
            account: self.account.clone(),
            balance: self.balance,
            total_received: self.total_received,
            total_from_penalties: self.total_from_penalties,
            total_withdrawn: self.total_withdrawn,
            transactions: Vec::new(),
        }
    }

    /// Adopt the balances of a staged copy and append the entries it recorded
    pub fn commit(&mut self, staged: TreasuryPool) {
        let TreasuryPool {
            account,
            balance,
            total_received,
            total_from_penalties,
            total_withdrawn,
            transactions,
        } = staged;
        self.account = account;
        self.balance = balance;
        self.total_received = total_received;
        self.total_from_penalties = total_from_penalties;
        self.total_withdrawn = total_withdrawn;
        self.transactions.extend(transactions);
    }

    pub fn stats(&self) -> TreasuryStats {
        TreasuryStats {
            balance: self.balance,
            total_received: self.total_received,
            total_from_penalties: self.total_from_penalties,
            total_withdrawn: self.total_withdrawn,
            transaction_count: self.transactions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_withdraw() {
        let mut pool = TreasuryPool::new("treasury");
        pool.deposit(
            TreasurySource::PenaltyShare { stake_id: StakeId(1) },
            Amount::from(100u64),
            10,
        )
        .unwrap();
        pool.withdraw("dev", Amount::from(30u64), "grant", 20).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.balance, Amount::from(70u64));
        assert_eq!(stats.total_from_penalties, Amount::from(100u64));
        assert_eq!(stats.total_withdrawn, Amount::from(30u64));
        assert_eq!(stats.transaction_count, 2);
    }

    #[test]
    fn test_overdraw_rejected() {
        let mut pool = TreasuryPool::new("treasury");
        let err = pool.withdraw("dev", Amount::ONE, "grant", 0).unwrap_err();
        assert!(matches!(err, TreasuryError::InsufficientBalance { .. }));
        assert!(pool.transactions().is_empty());
    }

    #[test]
    fn test_staged_commit_appends_only_new_entries() {
        let mut pool = TreasuryPool::new("treasury");
        pool.deposit(
            TreasurySource::PenaltyShare { stake_id: StakeId(1) },
            Amount::from(100u64),
            10,
        )
        .unwrap();

        let mut staged = pool.staged();
        assert!(staged.transactions().is_empty());
        assert_eq!(staged.balance(), Amount::from(100u64));
        staged.withdraw("dev", Amount::from(40u64), "grant", 20).unwrap();

        pool.commit(staged);
        assert_eq!(pool.balance(), Amount::from(60u64));
        assert_eq!(pool.transactions().len(), 2);
        assert!(matches!(
            pool.transactions()[1],
            TreasuryTransaction::Withdrawal { timestamp: 20, .. }
        ));
        assert_eq!(pool.stats().total_withdrawn, Amount::from(40u64));
    }

    #[test]
    fn test_zero_deposit_rejected() {
        let mut pool = TreasuryPool::new("treasury");
        let source = TreasurySource::Allocation {
            from: "team".to_string(),
        };
        assert!(pool.deposit(source, Amount::ZERO, 0).is_err());
    }
}
