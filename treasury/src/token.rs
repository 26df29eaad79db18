//! Token ledger the staking engine moves funds through
//!
//! The engine never does token accounting itself; it calls into a
//! [`TokenLedger`]. [`InMemoryToken`] is the ledger used for simulation and
//! tests.

use serde::{Deserialize, Serialize};
use stake_core::{Address, Amount};
use std::collections::HashMap;

use crate::error::{Result, TreasuryError};

/// ERC-20 style operations consumed by the engine
pub trait TokenLedger {
    fn balance_of(&self, account: &str) -> Amount;

    fn total_supply(&self) -> Amount;

    fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> Result<()>;

    fn mint(&mut self, to: &str, amount: Amount) -> Result<()>;

    fn burn(&mut self, from: &str, amount: Amount) -> Result<()>;
}

/// Balance map with an optional supply cap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryToken {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
    max_supply: Option<Amount>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_supply(max_supply: Amount) -> Self {
        Self {
            max_supply: Some(max_supply),
            ..Self::default()
        }
    }

    pub fn max_supply(&self) -> Option<Amount> {
        self.max_supply
    }

    /// Accounts holding a non-zero balance, largest first
    pub fn holders(&self) -> Vec<(&Address, Amount)> {
        let mut holders: Vec<(&Address, Amount)> = self
            .balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(account, balance)| (account, *balance))
            .collect();
        holders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        holders
    }

    fn debit(&mut self, account: &str, amount: Amount) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(TreasuryError::InsufficientBalance {
                account: account.to_string(),
                requested: amount,
                available,
            });
        }
        self.balances
            .insert(account.to_string(), available.checked_sub(amount)?);
        Ok(())
    }

    fn credit(&mut self, account: &str, amount: Amount) -> Result<()> {
        let balance = self.balance_of(account).checked_add(amount)?;
        self.balances.insert(account.to_string(), balance);
        Ok(())
    }
}

impl TokenLedger for InMemoryToken {
    fn balance_of(&self, account: &str) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> Result<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    fn mint(&mut self, to: &str, amount: Amount) -> Result<()> {
        let new_supply = self.total_supply.checked_add(amount)?;
        if let Some(cap) = self.max_supply {
            if new_supply > cap {
                return Err(TreasuryError::SupplyCapExceeded {
                    requested: amount,
                    cap,
                });
            }
        }
        self.credit(to, amount)?;
        self.total_supply = new_supply;
        Ok(())
    }

    fn burn(&mut self, from: &str, amount: Amount) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply = self.total_supply.checked_sub(amount)?;
        Ok(())
    }
}
