//! Order model for the tokenex settlement engine.
//!
//! An order is a resting BUY or SELL intent with escrowed funding. The
//! lifecycle is a two-transition state machine: `Open → Filled` and
//! `Open → Cancelled`, both terminal. There is no partial fill and no
//! implicit expiry.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MarketId, OrderId};

/// Which side of the market this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire encoding: BUY = 1, SELL = 2 (matches the operation numbering).
    #[must_use]
    pub fn wire_code(self) -> u8 {
        match self {
            Self::Buy => 1,
            Self::Sell => 2,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Wire encoding: OPEN = 1, FILLED = 2, CANCELLED = 3.
    #[must_use]
    pub fn wire_code(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Filled => 2,
            Self::Cancelled => 3,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A resting order. The id is content-addressed over the other fields
/// (see [`OrderId::derive`]), so two identical submissions in the same
/// block collide by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub market_id: MarketId,
    pub trader: AccountId,
    pub side: OrderSide,
    /// Token quantity, in the market token's base units.
    pub amount: u128,
    /// Limit price, scaled by the market's price precision.
    pub price: u128,
    /// Native value locked at placement. Zero for SELL orders (their
    /// escrow is the custodial token debit, not native currency).
    pub escrow: u128,
    /// Block height at placement; fills in this block are refused.
    pub block_created: u64,
    pub status: OrderStatus,
}

impl Order {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}
