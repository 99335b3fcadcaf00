//! The aggregate exchange state and typed-request dispatch.
//!
//! [`Exchange`] owns the four components and routes decoded [`Request`]s
//! to them, encoding each outcome as the operation's wire reply. The
//! encoding follows the op table: placements answer with the order id or
//! a result code, fulfillment with `1` or a code, the custody and admin
//! operations collapse every failure to `0`, and queries either emit
//! their field tuple or surface the failure code. An unrecognized opcode
//! never reaches this layer (`Opcode::from_u64` returns `None` and the
//! boundary answers with the empty sequence).

use tokenex_types::constants::{FAILURE, SUCCESS};
use tokenex_types::{
    AccountId, CallContext, ExchangeError, Ledger, Market, MarketId, Order, OrderId, Request,
    Result, SubBalance, Value,
};

use crate::access::AccessControl;
use crate::custody::BalanceCustody;
use crate::registry::MarketRegistry;
use crate::trading::TradeEngine;

/// Complete engine state: access control, market registry, custodial
/// balances, and the order book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The engine's own account on the substrate. Escrowed native value
    /// and custodied tokens sit here.
    account: AccountId,
    access: AccessControl,
    registry: MarketRegistry,
    custody: BalanceCustody,
    book: TradeEngine,
}

impl Exchange {
    #[must_use]
    pub fn new(owner: AccountId, account: AccountId) -> Self {
        Self {
            account,
            access: AccessControl::new(owner),
            registry: MarketRegistry::new(),
            custody: BalanceCustody::new(),
            book: TradeEngine::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.access.owner()
    }

    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Look up a market.
    ///
    /// # Errors
    /// `MissingMarket` if unregistered.
    pub fn market(&self, id: MarketId) -> Result<&Market> {
        self.registry.get(id)
    }

    /// Look up an order.
    ///
    /// # Errors
    /// `OrderNotFound` if no order with this id exists.
    pub fn order(&self, id: OrderId) -> Result<&Order> {
        self.book.get(id)
    }

    /// A trader's available and reserved balance for a market.
    ///
    /// # Errors
    /// `MissingMarket` if unregistered.
    pub fn sub_balance(&self, trader: AccountId, market_id: MarketId) -> Result<SubBalance> {
        self.registry.get(market_id)?;
        Ok(SubBalance {
            available: self.custody.available(trader, market_id),
            reserved: self.book.reserved(trader, market_id),
        })
    }

    /// Execute one operation against the engine.
    ///
    /// Every path validates completely before its first mutation, so a
    /// failure reply always implies untouched state.
    #[allow(clippy::too_many_lines)]
    pub fn execute<L: Ledger>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        request: Request,
    ) -> Vec<Value> {
        let block = ledger.current_block();
        match request {
            Request::Price { market_id } => match self.registry.get(market_id) {
                Ok(market) => vec![Value::Uint(market.last_price)],
                Err(err) => vec![Value::Uint(err.code())],
            },

            Request::Buy {
                amount,
                price,
                market_id,
            } => {
                // Amount and price are checked before the market lookup:
                // a doubly-invalid request reports 2 or 3, not 4.
                if amount == 0 {
                    return vec![Value::Uint(ExchangeError::MissingAmount.code())];
                }
                if price == 0 {
                    return vec![Value::Uint(ExchangeError::MissingPrice.code())];
                }
                let market = match self.registry.get(market_id) {
                    Ok(market) => market,
                    Err(err) => return vec![Value::Uint(err.code())],
                };
                match self.book.place_buy(ctx, market, amount, price, block) {
                    Ok(id) => vec![Value::OrderId(id)],
                    Err(err) => vec![Value::Uint(err.code())],
                }
            }

            Request::Sell {
                amount,
                price,
                market_id,
            } => {
                if amount == 0 {
                    return vec![Value::Uint(ExchangeError::MissingAmount.code())];
                }
                if price == 0 {
                    return vec![Value::Uint(ExchangeError::MissingPrice.code())];
                }
                let market = match self.registry.get(market_id) {
                    Ok(market) => market,
                    Err(err) => return vec![Value::Uint(err.code())],
                };
                match self
                    .book
                    .place_sell(ctx, market, &mut self.custody, amount, price, block)
                {
                    Ok(id) => vec![Value::OrderId(id)],
                    Err(err) => vec![Value::Uint(err.code())],
                }
            }

            Request::Trade { order_id } => {
                let market_id = match self.book.get(order_id) {
                    Ok(order) => order.market_id,
                    Err(err) => return vec![Value::Uint(err.code())],
                };
                let market = match self.registry.get_mut(market_id) {
                    Ok(market) => market,
                    Err(err) => return vec![Value::Uint(err.code())],
                };
                match self.book.fill(
                    ctx,
                    ledger,
                    &mut self.custody,
                    market,
                    self.account,
                    order_id,
                    block,
                ) {
                    Ok(()) => vec![Value::Uint(SUCCESS)],
                    Err(err) => vec![Value::Uint(err.code())],
                }
            }

            Request::Deposit { amount, market_id } => {
                let Ok(market) = self.registry.get(market_id) else {
                    return vec![Value::Uint(FAILURE)];
                };
                match self
                    .custody
                    .deposit(ledger, market, self.account, ctx.caller, amount)
                {
                    Ok(()) => vec![Value::Uint(SUCCESS)],
                    Err(_) => vec![Value::Uint(FAILURE)],
                }
            }

            Request::Withdraw { amount, market_id } => {
                let Ok(market) = self.registry.get(market_id) else {
                    return vec![Value::Uint(FAILURE)];
                };
                match self
                    .custody
                    .withdraw(ledger, market, self.account, ctx.caller, amount)
                {
                    Ok(()) => vec![Value::Uint(SUCCESS)],
                    Err(_) => vec![Value::Uint(FAILURE)],
                }
            }

            Request::Cancel { order_id } => {
                match self
                    .book
                    .cancel(ctx, ledger, &mut self.custody, self.account, order_id)
                {
                    Ok(()) => vec![Value::Uint(SUCCESS)],
                    Err(_) => vec![Value::Uint(FAILURE)],
                }
            }

            Request::AddMarket {
                symbol,
                token,
                decimals,
                price_precision,
                min_amount,
            } => {
                match self.registry.add_market(
                    &self.access,
                    ctx.caller,
                    symbol,
                    token,
                    decimals,
                    price_precision,
                    min_amount,
                    block,
                ) {
                    Ok(id) => vec![Value::Uint(u128::from(id.0))],
                    Err(_) => vec![Value::Uint(FAILURE)],
                }
            }

            Request::GetMarket { market_id } => match self.registry.get(market_id) {
                Ok(market) => encode_market(market),
                Err(err) => vec![Value::Uint(err.code())],
            },

            Request::GetTradeIds { market_id } => match self.registry.get(market_id) {
                Ok(market) => self
                    .book
                    .trade_ids(market.id)
                    .iter()
                    .map(|id| Value::OrderId(*id))
                    .collect(),
                Err(err) => vec![Value::Uint(err.code())],
            },

            Request::GetTrade { order_id } => match self.book.get(order_id) {
                Ok(order) => encode_order(order),
                Err(err) => vec![Value::Uint(err.code())],
            },

            Request::GetSubBalance { trader, market_id } => {
                match self.sub_balance(trader, market_id) {
                    Ok(balance) => vec![
                        Value::Uint(balance.available),
                        Value::Uint(balance.reserved),
                    ],
                    Err(err) => vec![Value::Uint(err.code())],
                }
            }

            Request::ChangeOwnership { new_owner } => {
                match self.access.transfer(ctx.caller, new_owner) {
                    Ok(()) => vec![Value::Uint(SUCCESS)],
                    Err(_) => vec![Value::Uint(FAILURE)],
                }
            }
        }
    }

    /// Check custody conservation against the token contracts: for each
    /// market, available balances plus open SELL reservations must equal
    /// the token quantity sitting in the engine's account.
    pub fn verify_custody<L: Ledger>(&self, ledger: &L) -> bool {
        let mut sound = true;
        for market in self.registry.iter() {
            let accounted =
                self.custody.market_total(market.id) + self.book.open_sell_total(market.id);
            let custodied = ledger.token_balance(market.token, self.account);
            if accounted != custodied {
                tracing::warn!(
                    market = %market.id,
                    accounted,
                    custodied,
                    "custody conservation violated"
                );
                sound = false;
            }
        }
        sound
    }
}

/// Apply one operation to a copy of the state, leaving the input
/// untouched. `execute` already guarantees zero mutation on failure, so
/// a failure reply returns a state equal to the input.
pub fn transition<L: Ledger>(
    state: &Exchange,
    ledger: &mut L,
    ctx: &CallContext,
    request: Request,
) -> (Exchange, Vec<Value>) {
    let mut next = state.clone();
    let reply = next.execute(ledger, ctx, request);
    (next, reply)
}

/// Full market record in storage order.
fn encode_market(market: &Market) -> Vec<Value> {
    vec![
        Value::Uint(u128::from(market.id.0)),
        Value::Symbol(market.symbol),
        Value::Account(market.token),
        Value::Uint(u128::from(market.decimals)),
        Value::Uint(market.price_precision),
        Value::Uint(market.min_amount),
        Value::Uint(market.last_price),
        Value::Account(market.owner),
        Value::Uint(u128::from(market.created_at_block)),
    ]
}

/// Full order record in storage order.
fn encode_order(order: &Order) -> Vec<Value> {
    vec![
        Value::OrderId(order.id),
        Value::Uint(u128::from(order.market_id.0)),
        Value::Account(order.trader),
        Value::Uint(u128::from(order.side.wire_code())),
        Value::Uint(order.amount),
        Value::Uint(order.price),
        Value::Uint(u128::from(order.block_created)),
        Value::Uint(u128::from(order.status.wire_code())),
    ]
}
