//! The order book and order lifecycle state machine.
//!
//! Lifecycle: `OPEN → FILLED` or `OPEN → CANCELLED`, both terminal.
//! Placement escrows funding (BUY: the attached native value; SELL: a
//! custodial token debit), cancellation reverses the escrow exactly, and
//! fulfillment settles all-or-nothing — there are no partial fills.
//!
//! Every operation validates completely before its first mutation, so a
//! returned error always implies untouched state. The one cross-call
//! rule enforced here is the same-block replay guard: an order can never
//! be filled in the block that created it.

use std::collections::HashMap;

use tokenex_types::{
    AccountId, CallContext, ExchangeError, Ledger, Market, MarketId, Order, OrderId, OrderSide,
    OrderStatus, Result,
};

use crate::custody::BalanceCustody;

/// Owns every order ever placed, plus the per-market insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeEngine {
    orders: HashMap<OrderId, Order>,
    /// Ids in placement order, per market. Terminal orders stay listed.
    by_market: HashMap<MarketId, Vec<OrderId>>,
}

impl TradeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            by_market: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------

    /// Place a BUY order, escrowing the attached native value.
    ///
    /// Validation order (each failure is distinct and checked before any
    /// mutation): zero amount, zero price, attached value below the
    /// market's floor, attached value not equal to the computed
    /// requirement, duplicate open order.
    pub fn place_buy(
        &mut self,
        ctx: &CallContext,
        market: &Market,
        amount: u128,
        price: u128,
        block: u64,
    ) -> Result<OrderId> {
        if amount == 0 {
            return Err(ExchangeError::MissingAmount);
        }
        if price == 0 {
            return Err(ExchangeError::MissingPrice);
        }
        if ctx.attached_value < market.min_amount {
            return Err(ExchangeError::InsufficientValue {
                needed: market.min_amount,
                available: ctx.attached_value,
            });
        }
        // An out-of-range amount/price computation is indistinguishable
        // from underfunding on the wire.
        let Some(required) = market.required_value(amount, price) else {
            return Err(ExchangeError::InsufficientValue {
                needed: u128::MAX,
                available: ctx.attached_value,
            });
        };
        if ctx.attached_value != required {
            return Err(ExchangeError::ValueMismatch {
                attached: ctx.attached_value,
                required,
            });
        }

        let id = OrderId::derive(ctx.caller, market.id, OrderSide::Buy, amount, price, block);
        self.check_duplicate(id)?;
        self.insert(Order {
            id,
            market_id: market.id,
            trader: ctx.caller,
            side: OrderSide::Buy,
            amount,
            price,
            escrow: ctx.attached_value,
            block_created: block,
            status: OrderStatus::Open,
        });
        tracing::debug!(id = %id.short(), market = %market.id, amount, price, "buy placed");
        Ok(id)
    }

    /// Place a SELL order, escrowing `amount` from the trader's
    /// custodial balance.
    pub fn place_sell(
        &mut self,
        ctx: &CallContext,
        market: &Market,
        custody: &mut BalanceCustody,
        amount: u128,
        price: u128,
        block: u64,
    ) -> Result<OrderId> {
        if amount == 0 {
            return Err(ExchangeError::MissingAmount);
        }
        if price == 0 {
            return Err(ExchangeError::MissingPrice);
        }
        let available = custody.available(ctx.caller, market.id);
        if available < amount {
            return Err(ExchangeError::InsufficientValue {
                needed: amount,
                available,
            });
        }

        let id = OrderId::derive(ctx.caller, market.id, OrderSide::Sell, amount, price, block);
        self.check_duplicate(id)?;
        // Cannot fail: availability was checked above and nothing has
        // mutated since.
        custody.debit(ctx.caller, market.id, amount)?;
        self.insert(Order {
            id,
            market_id: market.id,
            trader: ctx.caller,
            side: OrderSide::Sell,
            amount,
            price,
            escrow: 0,
            block_created: block,
            status: OrderStatus::Open,
        });
        tracing::debug!(id = %id.short(), market = %market.id, amount, price, "sell placed");
        Ok(id)
    }

    // -----------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------

    /// Cancel an open order, reversing its escrow exactly.
    ///
    /// Only the original trader may cancel, and only while OPEN.
    pub fn cancel<L: Ledger>(
        &mut self,
        ctx: &CallContext,
        ledger: &mut L,
        custody: &mut BalanceCustody,
        engine_account: AccountId,
        order_id: OrderId,
    ) -> Result<()> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;
        if order.trader != ctx.caller {
            return Err(ExchangeError::Unauthorized);
        }
        if !order.is_open() {
            return Err(ExchangeError::OrderNotOpen(order_id));
        }
        let (side, trader, market_id, amount, escrow) = (
            order.side,
            order.trader,
            order.market_id,
            order.amount,
            order.escrow,
        );

        match side {
            OrderSide::Buy => {
                if !ledger.send_value(engine_account, trader, escrow) {
                    return Err(ExchangeError::ValueTransferRefused);
                }
            }
            OrderSide::Sell => {
                custody.credit(trader, market_id, amount)?;
            }
        }
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.status = OrderStatus::Cancelled;
        }
        tracing::debug!(id = %order_id.short(), %side, "order cancelled");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Fulfillment
    // -----------------------------------------------------------------

    /// Fill a resting order as the taker. Settlement is atomic and
    /// all-or-nothing: custody, native value, order status, and the
    /// market's last price all move together or not at all.
    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    pub fn fill<L: Ledger>(
        &mut self,
        ctx: &CallContext,
        ledger: &mut L,
        custody: &mut BalanceCustody,
        market: &mut Market,
        engine_account: AccountId,
        order_id: OrderId,
        block: u64,
    ) -> Result<()> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))?;
        if !order.is_open() {
            return Err(ExchangeError::OrderNotOpen(order_id));
        }
        if block == order.block_created {
            return Err(ExchangeError::SameBlockReplay(order_id));
        }
        let (side, maker, amount, price, escrow) = (
            order.side,
            order.trader,
            order.amount,
            order.price,
            order.escrow,
        );

        match side {
            // Taker sells tokens into a resting BUY: custodial tokens
            // move taker → maker, the escrowed native value pays the
            // taker.
            OrderSide::Buy => {
                let taker_available = custody.available(ctx.caller, market.id);
                if taker_available < amount {
                    return Err(ExchangeError::InsufficientValue {
                        needed: amount,
                        available: taker_available,
                    });
                }
                custody
                    .available(maker, market.id)
                    .checked_add(amount)
                    .ok_or(ExchangeError::BalanceOverflow)?;
                if !ledger.send_value(engine_account, ctx.caller, escrow) {
                    return Err(ExchangeError::ValueTransferRefused);
                }
                // Checked above; cannot fail now.
                custody.debit(ctx.caller, market.id, amount)?;
                custody.credit(maker, market.id, amount)?;
            }
            // Taker buys from a resting SELL: the reserved tokens move
            // to the taker, the attached native value pays the maker.
            OrderSide::Sell => {
                let Some(required) = market.required_value(amount, price) else {
                    return Err(ExchangeError::InsufficientValue {
                        needed: u128::MAX,
                        available: ctx.attached_value,
                    });
                };
                if ctx.attached_value < required {
                    return Err(ExchangeError::InsufficientValue {
                        needed: required,
                        available: ctx.attached_value,
                    });
                }
                custody
                    .available(ctx.caller, market.id)
                    .checked_add(amount)
                    .ok_or(ExchangeError::BalanceOverflow)?;
                if !ledger.send_value(engine_account, maker, ctx.attached_value) {
                    return Err(ExchangeError::ValueTransferRefused);
                }
                custody.credit(ctx.caller, market.id, amount)?;
            }
        }

        if let Some(order) = self.orders.get_mut(&order_id) {
            order.status = OrderStatus::Filled;
        }
        market.last_price = price;
        tracing::debug!(
            id = %order_id.short(),
            %side,
            taker = %ctx.caller.short(),
            price,
            "order filled"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Look up an order by id.
    pub fn get(&self, order_id: OrderId) -> Result<&Order> {
        self.orders
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound(order_id))
    }

    /// All ids ever created for a market, in placement order, including
    /// filled and cancelled entries.
    #[must_use]
    pub fn trade_ids(&self, market_id: MarketId) -> &[OrderId] {
        self.by_market.get(&market_id).map_or(&[], Vec::as_slice)
    }

    /// Token quantity locked in a trader's open SELL orders for a market.
    #[must_use]
    pub fn reserved(&self, trader: AccountId, market_id: MarketId) -> u128 {
        self.open_sells(market_id)
            .filter(|order| order.trader == trader)
            .map(|order| order.amount)
            .sum()
    }

    /// Total token quantity locked in all open SELL orders for a market.
    #[must_use]
    pub fn open_sell_total(&self, market_id: MarketId) -> u128 {
        self.open_sells(market_id).map(|order| order.amount).sum()
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn open_sells(&self, market_id: MarketId) -> impl Iterator<Item = &Order> {
        self.orders.values().filter(move |order| {
            order.market_id == market_id && order.side == OrderSide::Sell && order.is_open()
        })
    }

    /// A content-hash collision with an OPEN order is a duplicate
    /// submission; terminal orders may be re-created.
    fn check_duplicate(&self, id: OrderId) -> Result<()> {
        match self.orders.get(&id) {
            Some(existing) if existing.is_open() => Err(ExchangeError::DuplicateOrder(id)),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, order: Order) {
        self.by_market
            .entry(order.market_id)
            .or_default()
            .push(order.id);
        self.orders.insert(order.id, order);
    }
}
