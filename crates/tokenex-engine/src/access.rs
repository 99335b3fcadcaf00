//! Owner identity and transfer of ownership.
//!
//! One global identity gates `addMarket` and `changeOwnership`. Every
//! gated path re-reads the owner at call time — no caching, no roles.

use tokenex_types::{AccountId, ExchangeError, Result};

/// Holds the single owner identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    owner: AccountId,
}

impl AccessControl {
    #[must_use]
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Fail with `Unauthorized` unless `caller` is the current owner.
    pub fn require_owner(&self, caller: AccountId) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(ExchangeError::Unauthorized)
        }
    }

    /// Reassign ownership. Only the current owner may call; the new
    /// owner is accepted unconditionally.
    pub fn transfer(&mut self, caller: AccountId, new_owner: AccountId) -> Result<()> {
        self.require_owner(caller)?;
        tracing::info!(old = %self.owner, new = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_check() {
        let owner = AccountId::from_bytes([1; 20]);
        let access = AccessControl::new(owner);
        assert!(access.require_owner(owner).is_ok());
    }

    #[test]
    fn non_owner_is_rejected() {
        let access = AccessControl::new(AccountId::from_bytes([1; 20]));
        let err = access
            .require_owner(AccountId::from_bytes([2; 20]))
            .unwrap_err();
        assert_eq!(err, ExchangeError::Unauthorized);
    }

    #[test]
    fn transfer_reassigns_owner() {
        let alice = AccountId::from_bytes([1; 20]);
        let bob = AccountId::from_bytes([2; 20]);
        let mut access = AccessControl::new(alice);
        access.transfer(alice, bob).unwrap();
        assert_eq!(access.owner(), bob);
        // Old owner is locked out immediately.
        assert!(access.require_owner(alice).is_err());
        assert!(access.require_owner(bob).is_ok());
    }

    #[test]
    fn transfer_by_non_owner_fails_without_change() {
        let alice = AccountId::from_bytes([1; 20]);
        let mallory = AccountId::from_bytes([3; 20]);
        let mut access = AccessControl::new(alice);
        assert!(access.transfer(mallory, mallory).is_err());
        assert_eq!(access.owner(), alice);
    }
}
