//! Per-account stake ledger
//!
//! Stakes live in an arena keyed by [`StakeId`]. Each account also keeps an
//! ordered list of its ids; positional removal swaps the last id into the
//! removed slot, so positions are unstable across removals while ids are not.

use serde::{Deserialize, Serialize};
use stake_core::{Address, Amount, MathResult, StakeId, Timestamp};
use std::collections::BTreeMap;

use crate::stake::Stake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeLedger {
    stakes: BTreeMap<StakeId, Stake>,
    by_account: BTreeMap<Address, Vec<StakeId>>,
    next_id: StakeId,
}

impl Default for StakeLedger {
    fn default() -> Self {
        Self {
            stakes: BTreeMap::new(),
            by_account: BTreeMap::new(),
            next_id: StakeId(1),
        }
    }
}

impl StakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new stake for `owner`
    pub fn open(
        &mut self,
        owner: &str,
        principal: Amount,
        days_committed: u64,
        now: Timestamp,
    ) -> StakeId {
        let id = self.next_id;
        self.next_id = id.next();

        let stake = Stake::new(id, owner.to_string(), principal, days_committed, now);
        self.stakes.insert(id, stake);
        self.by_account
            .entry(owner.to_string())
            .or_default()
            .push(id);
        id
    }

    pub fn get(&self, id: StakeId) -> Option<&Stake> {
        self.stakes.get(&id)
    }

    pub fn get_mut(&mut self, id: StakeId) -> Option<&mut Stake> {
        self.stakes.get_mut(&id)
    }

    /// Stake `id` if it belongs to `account`
    pub fn get_owned(&self, account: &str, id: StakeId) -> Option<&Stake> {
        self.stakes.get(&id).filter(|stake| stake.owner == account)
    }

    pub fn stake_ids(&self, account: &str) -> &[StakeId] {
        self.by_account
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stakes_of(&self, account: &str) -> Vec<&Stake> {
        self.stake_ids(account)
            .iter()
            .filter_map(|id| self.stakes.get(id))
            .collect()
    }

    pub fn stake_count(&self, account: &str) -> usize {
        self.stake_ids(account).len()
    }

    pub fn id_at(&self, account: &str, index: usize) -> Option<StakeId> {
        self.stake_ids(account).get(index).copied()
    }

    pub fn has_stakes(&self, account: &str) -> bool {
        self.stake_count(account) > 0
    }

    /// Remove by id; the account's last id takes the removed position
    pub fn remove_by_id(&mut self, account: &str, id: StakeId) -> Option<Stake> {
        let ids = self.by_account.get_mut(account)?;
        let position = ids.iter().position(|candidate| *candidate == id)?;
        ids.swap_remove(position);
        if ids.is_empty() {
            self.by_account.remove(account);
        }
        self.stakes.remove(&id)
    }

    pub fn remove_by_index(&mut self, account: &str, index: usize) -> Option<Stake> {
        let id = self.id_at(account, index)?;
        self.remove_by_id(account, id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stake> {
        self.stakes.values()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.by_account.keys()
    }

    pub fn account_count(&self) -> usize {
        self.by_account.len()
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    pub fn total_principal(&self) -> MathResult<Amount> {
        Amount::checked_sum(self.stakes.values().map(|stake| stake.principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(owner: &str, count: u64) -> (StakeLedger, Vec<StakeId>) {
        let mut ledger = StakeLedger::new();
        let ids = (0..count)
            .map(|i| ledger.open(owner, Amount::from(100 + i), 10, 0))
            .collect();
        (ledger, ids)
    }

    #[test]
    fn test_ids_are_monotonic() {
        let (_, ids) = ledger_with("alice", 3);
        assert_eq!(ids, vec![StakeId(1), StakeId(2), StakeId(3)]);
    }

    #[test]
    fn test_remove_by_index_swaps_last() {
        let (mut ledger, ids) = ledger_with("alice", 4);

        let removed = ledger.remove_by_index("alice", 1).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(ledger.stake_ids("alice"), &[ids[0], ids[3], ids[2]]);
    }

    #[test]
    fn test_remove_by_id_is_stable() {
        let (mut ledger, ids) = ledger_with("alice", 3);

        ledger.remove_by_id("alice", ids[0]).unwrap();
        // Positions shifted, ids did not
        assert_eq!(ledger.get(ids[2]).unwrap().principal, Amount::from(102u64));
        assert!(ledger.remove_by_id("alice", ids[0]).is_none());
    }

    #[test]
    fn test_ownership_is_checked() {
        let (mut ledger, ids) = ledger_with("alice", 1);
        assert!(ledger.get_owned("bob", ids[0]).is_none());
        assert!(ledger.remove_by_id("bob", ids[0]).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_empty_account_is_dropped() {
        let (mut ledger, ids) = ledger_with("alice", 1);
        ledger.remove_by_id("alice", ids[0]).unwrap();
        assert!(!ledger.has_stakes("alice"));
        assert_eq!(ledger.account_count(), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_total_principal() {
        let (ledger, _) = ledger_with("alice", 3);
        assert_eq!(ledger.total_principal().unwrap(), Amount::from(303u64));
    }
}
