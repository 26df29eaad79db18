//! Set of accounts holding at least one open stake
//!
//! Backed by a vector with swap-remove so iteration stays O(active users);
//! the position index is rebuilt on deserialization.

use serde::{Deserialize, Serialize};
use stake_core::Address;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Address>", into = "Vec<Address>")]
pub struct ActiveUserRegistry {
    users: Vec<Address>,
    positions: HashMap<Address, usize>,
}

impl ActiveUserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the account was not already registered
    pub fn register(&mut self, account: &str) -> bool {
        if self.positions.contains_key(account) {
            return false;
        }
        self.positions.insert(account.to_string(), self.users.len());
        self.users.push(account.to_string());
        true
    }

    /// Returns true if the account was registered
    pub fn deregister(&mut self, account: &str) -> bool {
        let Some(position) = self.positions.remove(account) else {
            return false;
        };

        self.users.swap_remove(position);
        if let Some(moved) = self.users.get(position) {
            self.positions.insert(moved.clone(), position);
        }
        true
    }

    pub fn contains(&self, account: &str) -> bool {
        self.positions.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[Address] {
        &self.users
    }
}

impl From<Vec<Address>> for ActiveUserRegistry {
    fn from(users: Vec<Address>) -> Self {
        let mut registry = ActiveUserRegistry::new();
        for user in users {
            registry.register(&user);
        }
        registry
    }
}

impl From<ActiveUserRegistry> for Vec<Address> {
    fn from(registry: ActiveUserRegistry) -> Self {
        registry.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ActiveUserRegistry::new();
        assert!(registry.register("alice"));
        assert!(!registry.register("alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_swap_remove_keeps_positions() {
        let mut registry = ActiveUserRegistry::new();
        for user in ["a", "b", "c", "d"] {
            registry.register(user);
        }

        assert!(registry.deregister("b"));
        assert_eq!(registry.users(), &["a", "d", "c"]);

        // "d" moved into slot 1; removing it must still work
        assert!(registry.deregister("d"));
        assert_eq!(registry.users(), &["a", "c"]);
        assert!(!registry.deregister("d"));
        assert!(registry.contains("c"));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let mut registry = ActiveUserRegistry::new();
        registry.register("alice");
        registry.register("bob");

        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"["alice","bob"]"#);

        let mut back: ActiveUserRegistry = serde_json::from_str(&json).unwrap();
        assert!(back.deregister("alice"));
        assert_eq!(back.users(), &["bob"]);
    }
}
