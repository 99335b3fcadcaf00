//! Typed request and reply model.
//!
//! Inbound calls are decoded by an external boundary layer into a
//! [`Request`] variant before they reach the engine; the engine itself is
//! opcode-agnostic. Replies are sequences of [`Value`] words: the leading
//! word is `1` (or a richer payload) on success and a result code
//! otherwise. An unrecognized opcode never produces a `Request` at all —
//! the boundary answers with the **empty** sequence, which is distinct
//! from every explicit result code.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MarketId, OrderId, Symbol};

/// Wire operation numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    Price = 0,
    Buy = 1,
    Sell = 2,
    Trade = 3,
    Deposit = 4,
    Withdraw = 5,
    Cancel = 6,
    AddMarket = 7,
    GetMarket = 8,
    GetTradeIds = 9,
    GetTrade = 10,
    GetSubBalance = 11,
    ChangeOwnership = 12,
}

impl Opcode {
    /// Decode a wire opcode. `None` means UnknownOperation: the boundary
    /// replies with the empty sequence and the engine is never invoked.
    #[must_use]
    pub fn from_u64(op: u64) -> Option<Self> {
        match op {
            0 => Some(Self::Price),
            1 => Some(Self::Buy),
            2 => Some(Self::Sell),
            3 => Some(Self::Trade),
            4 => Some(Self::Deposit),
            5 => Some(Self::Withdraw),
            6 => Some(Self::Cancel),
            7 => Some(Self::AddMarket),
            8 => Some(Self::GetMarket),
            9 => Some(Self::GetTradeIds),
            10 => Some(Self::GetTrade),
            11 => Some(Self::GetSubBalance),
            12 => Some(Self::ChangeOwnership),
            _ => None,
        }
    }
}

/// One decoded operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    Price {
        market_id: MarketId,
    },
    Buy {
        amount: u128,
        price: u128,
        market_id: MarketId,
    },
    Sell {
        amount: u128,
        price: u128,
        market_id: MarketId,
    },
    Trade {
        order_id: OrderId,
    },
    Deposit {
        amount: u128,
        market_id: MarketId,
    },
    Withdraw {
        amount: u128,
        market_id: MarketId,
    },
    Cancel {
        order_id: OrderId,
    },
    AddMarket {
        symbol: Symbol,
        token: AccountId,
        decimals: u32,
        price_precision: u128,
        min_amount: u128,
    },
    GetMarket {
        market_id: MarketId,
    },
    GetTradeIds {
        market_id: MarketId,
    },
    GetTrade {
        order_id: OrderId,
    },
    GetSubBalance {
        trader: AccountId,
        market_id: MarketId,
    },
    ChangeOwnership {
        new_owner: AccountId,
    },
}

impl Request {
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Price { .. } => Opcode::Price,
            Self::Buy { .. } => Opcode::Buy,
            Self::Sell { .. } => Opcode::Sell,
            Self::Trade { .. } => Opcode::Trade,
            Self::Deposit { .. } => Opcode::Deposit,
            Self::Withdraw { .. } => Opcode::Withdraw,
            Self::Cancel { .. } => Opcode::Cancel,
            Self::AddMarket { .. } => Opcode::AddMarket,
            Self::GetMarket { .. } => Opcode::GetMarket,
            Self::GetTradeIds { .. } => Opcode::GetTradeIds,
            Self::GetTrade { .. } => Opcode::GetTrade,
            Self::GetSubBalance { .. } => Opcode::GetSubBalance,
            Self::ChangeOwnership { .. } => Opcode::ChangeOwnership,
        }
    }
}

/// One word of a reply sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// An unsigned quantity, result code, or market id.
    Uint(u128),
    /// A signed 256-bit order id.
    OrderId(OrderId),
    /// An identity word.
    Account(AccountId),
    /// A fixed-width symbol word.
    Symbol(Symbol),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_roundtrip() {
        for op in 0..=12 {
            let decoded = Opcode::from_u64(op).expect("known opcode");
            assert_eq!(decoded as u64, op);
        }
    }

    #[test]
    fn unknown_opcode_is_none() {
        assert_eq!(Opcode::from_u64(13), None);
        assert_eq!(Opcode::from_u64(99), None);
    }

    #[test]
    fn request_reports_its_opcode() {
        let req = Request::Buy {
            amount: 10,
            price: 5,
            market_id: MarketId(1),
        };
        assert_eq!(req.opcode(), Opcode::Buy);
        let req = Request::ChangeOwnership {
            new_owner: AccountId::from_bytes([2; 20]),
        };
        assert_eq!(req.opcode(), Opcode::ChangeOwnership);
    }

    #[test]
    fn request_serde_roundtrip() {
        let req = Request::AddMarket {
            symbol: Symbol::new("ETX").unwrap(),
            token: AccountId::from_bytes([9; 20]),
            decimals: 5,
            price_precision: 100_000_000,
            min_amount: 1_000_000_000_000_000_000,
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}
