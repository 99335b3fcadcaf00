//! Market model: the registered trading venues and their fixed-point
//! value conversion.
//!
//! A market binds a token contract to trading parameters. Everything but
//! `last_price` is immutable after registration; `last_price` is written
//! only by the trade engine on a successful fill.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SYMBOL_LEN, NATIVE_DECIMALS};
use crate::{AccountId, MarketId};

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// Short fixed-width token identifier (1..=8 ASCII bytes, NUL-padded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Symbol([u8; MAX_SYMBOL_LEN]);

impl Symbol {
    /// The empty symbol. Never valid for a registered market; exists so
    /// the boundary can represent a malformed request and let the
    /// registry reject it with the proper result code.
    pub const EMPTY: Self = Self([0u8; MAX_SYMBOL_LEN]);

    /// Parse a symbol from text. Returns `None` if the input is longer
    /// than [`MAX_SYMBOL_LEN`] bytes or contains non-printable ASCII.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_SYMBOL_LEN || bytes.iter().any(|b| !b.is_ascii_graphic()) {
            return None;
        }
        let mut out = [0u8; MAX_SYMBOL_LEN];
        out[..bytes.len()].copy_from_slice(bytes);
        Some(Self(out))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(MAX_SYMBOL_LEN);
        // Construction guarantees printable ASCII up to the first NUL.
        std::str::from_utf8(&self.0[..len]).unwrap_or("")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// A registered token market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Sequential id, assigned once at registration.
    pub id: MarketId,
    pub symbol: Symbol,
    /// The external token contract custodied for this market.
    pub token: AccountId,
    /// Decimal places of the token's base unit.
    pub decimals: u32,
    /// Price scaling factor (prices are `price / price_precision` whole
    /// native units per whole token). Always > 0.
    pub price_precision: u128,
    /// Minimum attached native value accepted for a BUY placement.
    pub min_amount: u128,
    /// Price of the most recent fill, or the "no trade yet" sentinel.
    pub last_price: u128,
    pub owner: AccountId,
    pub created_at_block: u64,
}

impl Market {
    /// Native value required to fund an order of `amount` token base
    /// units at `price`:
    ///
    /// ```text
    /// amount * price * 10^(18 - decimals) / price_precision
    /// ```
    ///
    /// `None` on arithmetic overflow; callers report that as an
    /// insufficient-value failure, matching the wire behavior for
    /// out-of-range amounts and prices.
    #[must_use]
    pub fn required_value(&self, amount: u128, price: u128) -> Option<u128> {
        let product = amount.checked_mul(price)?;
        let scaled = if self.decimals <= NATIVE_DECIMALS {
            let scale = 10u128.checked_pow(NATIVE_DECIMALS - self.decimals)?;
            product.checked_mul(scale)?
        } else {
            let scale = 10u128.checked_pow(self.decimals - NATIVE_DECIMALS)?;
            product.checked_div(scale)?
        };
        scaled.checked_div(self.price_precision)
    }
}
