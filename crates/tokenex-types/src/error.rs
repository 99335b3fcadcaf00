//! Error types for the tokenex settlement engine.
//!
//! All errors use the `EX_ERR_` prefix convention for easy grepping in
//! logs. The number after the prefix is the **wire result code** returned
//! to callers (see [`ExchangeError::code`]); several distinct failure
//! modes share code `0` (the generic failure / unauthorized code) but
//! stay separate variants so internal callers can match precisely.
//!
//! Every failure is local and returned as data. Engine operations check
//! all failure paths before mutating anything, so an error always implies
//! zero state change.

use thiserror::Error;

use crate::{MarketId, OrderId};

/// Central error enum for all tokenex operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    /// The caller is not authorized for this operation (owner-gated
    /// paths, or cancelling someone else's order).
    #[error("EX_ERR_0: unauthorized caller")]
    Unauthorized,

    /// Market registration parameters were rejected.
    #[error("EX_ERR_0: invalid market: {reason}")]
    InvalidMarket { reason: String },

    /// No order with this id exists.
    #[error("EX_ERR_0: order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order exists but is no longer OPEN.
    #[error("EX_ERR_0: order {0} is not open")]
    OrderNotOpen(OrderId),

    /// The external token contract refused the transfer.
    #[error("EX_ERR_0: token transfer refused")]
    TokenTransferRefused,

    /// The substrate refused a native currency transfer.
    #[error("EX_ERR_0: native value transfer refused")]
    ValueTransferRefused,

    /// A balance credit would overflow the accounting width.
    #[error("EX_ERR_0: balance overflow")]
    BalanceOverflow,

    /// Order amount was zero.
    #[error("EX_ERR_2: missing amount")]
    MissingAmount,

    /// Order price was zero.
    #[error("EX_ERR_3: missing price")]
    MissingPrice,

    /// The market id is zero or names no registered market.
    #[error("EX_ERR_4: missing market: {0}")]
    MissingMarket(MarketId),

    /// Not enough funding for the operation (attached native value,
    /// custodial balance, or an out-of-range value computation).
    #[error("EX_ERR_12: insufficient value: need {needed}, have {available}")]
    InsufficientValue { needed: u128, available: u128 },

    /// The attached value clears the market's floor but does not equal
    /// the computed requirement — the caller priced a different market.
    #[error("EX_ERR_13: value mismatch: attached {attached}, required {required}")]
    ValueMismatch { attached: u128, required: u128 },

    /// A fill was attempted in the order's creation block.
    #[error("EX_ERR_14: order {0} cannot be filled in its creation block")]
    SameBlockReplay(OrderId),

    /// An OPEN order with the identical content hash already exists.
    #[error("EX_ERR_15: open order {0} already exists")]
    DuplicateOrder(OrderId),
}

impl ExchangeError {
    /// The wire result code for this failure.
    #[must_use]
    pub fn code(&self) -> u128 {
        match self {
            Self::Unauthorized
            | Self::InvalidMarket { .. }
            | Self::OrderNotFound(_)
            | Self::OrderNotOpen(_)
            | Self::TokenTransferRefused
            | Self::ValueTransferRefused
            | Self::BalanceOverflow => 0,
            Self::MissingAmount => 2,
            Self::MissingPrice => 3,
            Self::MissingMarket(_) => 4,
            Self::InsufficientValue { .. } => 12,
            Self::ValueMismatch { .. } => 13,
            Self::SameBlockReplay(_) => 14,
            Self::DuplicateOrder(_) => 15,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ExchangeError>;
