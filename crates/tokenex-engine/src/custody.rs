//! Balance custody for the tokenex escrow model.
//!
//! Tracks per-(trader, market) custodial token balances and mediates
//! deposit/withdraw against the external token contract. All mutations
//! are atomic: either the full operation succeeds or the balance is
//! unchanged.
//!
//! Custody holds the *available* side only; the quantity reserved in
//! open SELL orders lives in the order book and is reported alongside by
//! the aggregate (see `Exchange::sub_balance`).

use std::collections::HashMap;

use tokenex_types::{AccountId, ExchangeError, Ledger, Market, MarketId, Result};

/// Source of truth for available custodial balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceCustody {
    /// Per-(trader, market) available token quantity.
    balances: HashMap<(AccountId, MarketId), u128>,
}

impl BalanceCustody {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Available balance for a (trader, market) pair.
    #[must_use]
    pub fn available(&self, trader: AccountId, market_id: MarketId) -> u128 {
        self.balances
            .get(&(trader, market_id))
            .copied()
            .unwrap_or_default()
    }

    /// Credit a trader's balance (deposit or settlement receive leg).
    ///
    /// # Errors
    /// `BalanceOverflow` if the credit would overflow the accounting
    /// width; the balance is unchanged.
    pub fn credit(&mut self, trader: AccountId, market_id: MarketId, amount: u128) -> Result<()> {
        let entry = self.balances.entry((trader, market_id)).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(ExchangeError::BalanceOverflow)?;
        Ok(())
    }

    /// Debit a trader's balance (withdrawal, SELL escrow, fill pay leg).
    ///
    /// # Errors
    /// `InsufficientValue` if the balance cannot cover `amount`; the
    /// balance is unchanged.
    pub fn debit(&mut self, trader: AccountId, market_id: MarketId, amount: u128) -> Result<()> {
        let available = self.available(trader, market_id);
        if available < amount {
            return Err(ExchangeError::InsufficientValue {
                needed: amount,
                available,
            });
        }
        if let Some(entry) = self.balances.get_mut(&(trader, market_id)) {
            *entry -= amount;
        }
        Ok(())
    }

    /// Deposit `amount` of the market's token into custody.
    ///
    /// Asks the token contract to move the funds from the trader to the
    /// engine's account; credits the sub-balance only if the contract
    /// accepts.
    ///
    /// # Errors
    /// `TokenTransferRefused` if the token contract rejects the move.
    pub fn deposit<L: Ledger>(
        &mut self,
        ledger: &mut L,
        market: &Market,
        engine_account: AccountId,
        trader: AccountId,
        amount: u128,
    ) -> Result<()> {
        // Overflow is checked before touching the token contract so a
        // refused credit cannot strand funds in the engine account.
        let current = self.available(trader, market.id);
        let credited = current
            .checked_add(amount)
            .ok_or(ExchangeError::BalanceOverflow)?;
        if !ledger.token_transfer(market.token, trader, engine_account, amount) {
            return Err(ExchangeError::TokenTransferRefused);
        }
        self.balances.insert((trader, market.id), credited);
        tracing::debug!(trader = %trader.short(), market = %market.id, amount, "deposit");
        Ok(())
    }

    /// Withdraw `amount` of the market's token back to the trader.
    ///
    /// # Errors
    /// - `InsufficientValue` if the sub-balance cannot cover `amount`
    /// - `TokenTransferRefused` if the token contract rejects the return
    ///
    /// Both checks run before any mutation.
    pub fn withdraw<L: Ledger>(
        &mut self,
        ledger: &mut L,
        market: &Market,
        engine_account: AccountId,
        trader: AccountId,
        amount: u128,
    ) -> Result<()> {
        let available = self.available(trader, market.id);
        if available < amount {
            return Err(ExchangeError::InsufficientValue {
                needed: amount,
                available,
            });
        }
        if !ledger.token_transfer(market.token, engine_account, trader, amount) {
            return Err(ExchangeError::TokenTransferRefused);
        }
        self.balances.insert((trader, market.id), available - amount);
        tracing::debug!(trader = %trader.short(), market = %market.id, amount, "withdraw");
        Ok(())
    }

    /// Sum of all available balances in one market.
    #[must_use]
    pub fn market_total(&self, market_id: MarketId) -> u128 {
        self.balances
            .iter()
            .filter(|((_, m), _)| *m == market_id)
            .map(|(_, amount)| amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenex_types::constants::NEW_MARKET_LAST_PRICE;
    use tokenex_types::{MemoryLedger, Symbol};

    fn market() -> Market {
        Market {
            id: MarketId(1),
            symbol: Symbol::new("ETX").unwrap(),
            token: AccountId::from_bytes([0xee; 20]),
            decimals: 5,
            price_precision: 100_000_000,
            min_amount: 1_000_000_000_000_000_000,
            last_price: NEW_MARKET_LAST_PRICE,
            owner: AccountId::from_bytes([1; 20]),
            created_at_block: 0,
        }
    }

    fn engine_account() -> AccountId {
        AccountId::from_bytes([0xcc; 20])
    }

    #[test]
    fn deposit_moves_tokens_into_custody() {
        let mut custody = BalanceCustody::new();
        let mut ledger = MemoryLedger::new();
        let market = market();
        let alice = AccountId::from_bytes([1; 20]);
        ledger.mint_token(market.token, alice, 100_000_000);

        custody
            .deposit(&mut ledger, &market, engine_account(), alice, 100_000_000)
            .unwrap();

        assert_eq!(custody.available(alice, market.id), 100_000_000);
        assert_eq!(ledger.token_balance(market.token, alice), 0);
        assert_eq!(
            ledger.token_balance(market.token, engine_account()),
            100_000_000
        );
    }

    #[test]
    fn deposit_refused_by_token_leaves_no_credit() {
        let mut custody = BalanceCustody::new();
        let mut ledger = MemoryLedger::new();
        let market = market();
        let alice = AccountId::from_bytes([1; 20]);
        // Alice holds nothing, so the token contract refuses.
        let err = custody
            .deposit(&mut ledger, &market, engine_account(), alice, 1)
            .unwrap_err();
        assert_eq!(err, ExchangeError::TokenTransferRefused);
        assert_eq!(custody.available(alice, market.id), 0);
    }

    #[test]
    fn withdraw_returns_tokens() {
        let mut custody = BalanceCustody::new();
        let mut ledger = MemoryLedger::new();
        let market = market();
        let alice = AccountId::from_bytes([1; 20]);
        ledger.mint_token(market.token, alice, 500);
        custody
            .deposit(&mut ledger, &market, engine_account(), alice, 500)
            .unwrap();

        custody
            .withdraw(&mut ledger, &market, engine_account(), alice, 200)
            .unwrap();

        assert_eq!(custody.available(alice, market.id), 300);
        assert_eq!(ledger.token_balance(market.token, alice), 200);
    }

    #[test]
    fn withdraw_beyond_balance_fails_without_mutation() {
        let mut custody = BalanceCustody::new();
        let mut ledger = MemoryLedger::new();
        let market = market();
        let alice = AccountId::from_bytes([1; 20]);
        ledger.mint_token(market.token, alice, 100);
        custody
            .deposit(&mut ledger, &market, engine_account(), alice, 100)
            .unwrap();

        let err = custody
            .withdraw(&mut ledger, &market, engine_account(), alice, 101)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientValue { .. }));
        assert_eq!(custody.available(alice, market.id), 100);
        assert_eq!(ledger.token_balance(market.token, engine_account()), 100);
    }

    #[test]
    fn credit_and_debit_are_checked() {
        let mut custody = BalanceCustody::new();
        let alice = AccountId::from_bytes([1; 20]);
        custody.credit(alice, MarketId(1), u128::MAX).unwrap();
        assert_eq!(
            custody.credit(alice, MarketId(1), 1).unwrap_err(),
            ExchangeError::BalanceOverflow
        );
        assert!(matches!(
            custody.debit(AccountId::from_bytes([2; 20]), MarketId(1), 1),
            Err(ExchangeError::InsufficientValue { .. })
        ));
    }

    #[test]
    fn market_total_sums_all_traders() {
        let mut custody = BalanceCustody::new();
        let alice = AccountId::from_bytes([1; 20]);
        let bob = AccountId::from_bytes([2; 20]);
        custody.credit(alice, MarketId(1), 100).unwrap();
        custody.credit(bob, MarketId(1), 50).unwrap();
        custody.credit(bob, MarketId(2), 7).unwrap();
        assert_eq!(custody.market_total(MarketId(1)), 150);
        assert_eq!(custody.market_total(MarketId(2)), 7);
    }
}
