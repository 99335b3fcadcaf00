//! External collaborator contracts.
//!
//! The engine never talks to the outside world directly: the execution
//! substrate (block height, native value movement) and the per-market
//! token contracts sit behind the [`Ledger`] trait, and the per-call
//! sender/value context arrives as a [`CallContext`]. The substrate
//! guarantees atomic commit-or-discard around every call; the engine's
//! own obligation is to fail before mutating.

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Per-call context supplied by the substrate: who is calling and how
/// much native currency the call attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: AccountId,
    pub attached_value: u128,
}

impl CallContext {
    /// A plain call with no attached value.
    #[must_use]
    pub fn new(caller: AccountId) -> Self {
        Self {
            caller,
            attached_value: 0,
        }
    }

    /// A call carrying native value (BUY placement, SELL fulfillment).
    #[must_use]
    pub fn with_value(caller: AccountId, attached_value: u128) -> Self {
        Self {
            caller,
            attached_value,
        }
    }
}

/// The execution substrate and the token contracts it hosts.
///
/// `send_value` moves native currency out of the engine's own account
/// (the `from` argument is always the engine; it is explicit because
/// Rust traits have no ambient caller). `token_transfer` invokes the
/// external token contract at `token` and reports whether the contract
/// accepted the transfer.
pub trait Ledger {
    /// Height of the block the current call executes in.
    fn current_block(&self) -> u64;

    /// Transfer native currency. Returns `false` if `from` lacks funds.
    fn send_value(&mut self, from: AccountId, to: AccountId, amount: u128) -> bool;

    /// Ask the token contract to move `amount` between holders.
    /// Returns `false` if the contract rejects the transfer.
    fn token_transfer(
        &mut self,
        token: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> bool;

    /// Current token balance of `holder` at the token contract.
    fn token_balance(&self, token: AccountId, holder: AccountId) -> u128;
}

// ---------------------------------------------------------------------------
// In-memory substrate for tests
// ---------------------------------------------------------------------------

/// Test double for the substrate: native and token balances in maps,
/// a manually advanced block counter, and minting helpers.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct MemoryLedger {
    block: u64,
    native: std::collections::HashMap<AccountId, u128>,
    tokens: std::collections::HashMap<(AccountId, AccountId), u128>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_block(&mut self, blocks: u64) {
        self.block += blocks;
    }

    pub fn mint_native(&mut self, holder: AccountId, amount: u128) {
        *self.native.entry(holder).or_default() += amount;
    }

    pub fn mint_token(&mut self, token: AccountId, holder: AccountId, amount: u128) {
        *self.tokens.entry((token, holder)).or_default() += amount;
    }

    #[must_use]
    pub fn native_balance(&self, holder: AccountId) -> u128 {
        self.native.get(&holder).copied().unwrap_or_default()
    }

    /// Build the context for a value-carrying call, moving the attached
    /// native value from the caller into the callee's account the way
    /// the substrate does before the callee runs.
    ///
    /// # Panics
    /// Panics if the caller cannot cover `value` (a test setup bug).
    pub fn fund_call(&mut self, caller: AccountId, callee: AccountId, value: u128) -> CallContext {
        assert!(
            self.send_value(caller, callee, value),
            "test caller {caller} cannot attach {value}"
        );
        CallContext::with_value(caller, value)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Ledger for MemoryLedger {
    fn current_block(&self) -> u64 {
        self.block
    }

    fn send_value(&mut self, from: AccountId, to: AccountId, amount: u128) -> bool {
        let Some(balance) = self.native.get_mut(&from) else {
            return amount == 0;
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        *self.native.entry(to).or_default() += amount;
        true
    }

    fn token_transfer(
        &mut self,
        token: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> bool {
        let Some(balance) = self.tokens.get_mut(&(token, from)) else {
            return amount == 0;
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        *self.tokens.entry((token, to)).or_default() += amount;
        true
    }

    fn token_balance(&self, token: AccountId, holder: AccountId) -> u128 {
        self.tokens.get(&(token, holder)).copied().unwrap_or_default()
    }
}
