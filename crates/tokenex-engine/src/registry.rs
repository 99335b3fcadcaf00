//! Market registry: owns the market list and assigns sequential ids.
//!
//! Registration is owner-gated. `symbol`, `token`, `decimals`, and
//! `price_precision` are immutable after creation; only the trade engine
//! touches `last_price` afterwards.

use std::collections::BTreeMap;

use tokenex_types::constants::{FIRST_MARKET_ID, NEW_MARKET_LAST_PRICE};
use tokenex_types::{AccountId, ExchangeError, Market, MarketId, Result, Symbol};

use crate::access::AccessControl;

/// Owns all registered markets, keyed by their sequential id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRegistry {
    markets: BTreeMap<MarketId, Market>,
    next_id: MarketId,
}

impl MarketRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            markets: BTreeMap::new(),
            next_id: MarketId(FIRST_MARKET_ID),
        }
    }

    /// Register a new market and return its id.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the global owner
    /// - `InvalidMarket` for an empty symbol, null token reference, or
    ///   zero price precision
    #[allow(clippy::too_many_arguments)]
    pub fn add_market(
        &mut self,
        access: &AccessControl,
        caller: AccountId,
        symbol: Symbol,
        token: AccountId,
        decimals: u32,
        price_precision: u128,
        min_amount: u128,
        block: u64,
    ) -> Result<MarketId> {
        access.require_owner(caller)?;
        if symbol.is_empty() {
            return Err(ExchangeError::InvalidMarket {
                reason: "empty symbol".into(),
            });
        }
        if token.is_zero() {
            return Err(ExchangeError::InvalidMarket {
                reason: "null token reference".into(),
            });
        }
        if price_precision == 0 {
            return Err(ExchangeError::InvalidMarket {
                reason: "zero price precision".into(),
            });
        }

        let id = self.next_id;
        let market = Market {
            id,
            symbol,
            token,
            decimals,
            price_precision,
            min_amount,
            last_price: NEW_MARKET_LAST_PRICE,
            owner: caller,
            created_at_block: block,
        };
        tracing::info!(%id, %symbol, token = %token.short(), "market registered");
        self.markets.insert(id, market);
        self.next_id = id.next();
        Ok(id)
    }

    /// Look up a market.
    ///
    /// # Errors
    /// `MissingMarket` if the id is zero or unregistered.
    pub fn get(&self, id: MarketId) -> Result<&Market> {
        self.markets.get(&id).ok_or(ExchangeError::MissingMarket(id))
    }

    /// Mutable lookup, for the trade engine's last-price update.
    pub fn get_mut(&mut self, id: MarketId) -> Result<&mut Market> {
        self.markets
            .get_mut(&id)
            .ok_or(ExchangeError::MissingMarket(id))
    }

    /// All registered markets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
