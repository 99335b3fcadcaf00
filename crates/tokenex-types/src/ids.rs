//! Identifiers used throughout tokenex.
//!
//! `AccountId` is an opaque 20-byte substrate identity. `OrderId` is
//! content-addressed: the SHA-256 digest of the order parameters,
//! interpreted as a two's-complement signed 256-bit integer. The sign is
//! observable on the wire, so the signed rendering is part of the contract.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::OrderSide;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A trader or contract identity (20 raw bytes, rendered as hex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    /// The all-zero identity, used as the "null reference" sentinel.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the null identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl AccountId {
    pub fn random() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill(&mut bytes);
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// MarketId
// ---------------------------------------------------------------------------

/// Sequential market identifier. The first registered market is `1`;
/// `0` never names a market and decodes as "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketId(pub u64);

impl MarketId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "market:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Deterministic order identifier: SHA-256 over the canonical encoding of
/// `(trader, market, side, amount, price, block)`.
///
/// The digest is interpreted as a **signed** two's-complement 256-bit
/// integer. Roughly half of all ids are negative; callers compare and
/// store ids by value, so the sign must survive display and transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub [u8; 32]);

impl OrderId {
    /// Derive the id for an order's parameters.
    ///
    /// Identical parameters in the same block always produce the identical
    /// id; any differing parameter produces an unrelated digest.
    #[must_use]
    pub fn derive(
        trader: AccountId,
        market: MarketId,
        side: OrderSide,
        amount: u128,
        price: u128,
        block: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"tokenex:order_id:v1:");
        hasher.update(trader.as_bytes());
        hasher.update(market.0.to_le_bytes());
        hasher.update([side.wire_code()]);
        hasher.update(amount.to_le_bytes());
        hasher.update(price.to_le_bytes());
        hasher.update(block.to_le_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Sign bit of the two's-complement interpretation.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0[0] & 0x80 != 0
    }

    /// Full digest as lowercase hex (unsigned raw bytes).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Two's-complement magnitude: negate if the sign bit is set.
    fn magnitude(&self) -> [u8; 32] {
        if self.is_negative() {
            twos_complement_negate(self.0)
        } else {
            self.0
        }
    }
}

/// Negate a big-endian 256-bit value in two's complement.
fn twos_complement_negate(bytes: [u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry = 1u16;
    for i in (0..32).rev() {
        let v = u16::from(!bytes[i]) + carry;
        out[i] = (v & 0xff) as u8;
        carry = v >> 8;
    }
    out
}

/// Render a big-endian 256-bit magnitude as a decimal string.
#[allow(clippy::cast_possible_truncation)]
fn decimal_magnitude(bytes: [u8; 32]) -> String {
    // 10^19 is the largest power of ten below 2^64, so each division
    // step peels off 19 decimal digits while limbs stay in u64.
    const CHUNK: u128 = 10_000_000_000_000_000_000;
    let mut limbs = [0u64; 4];
    for (i, b) in bytes.iter().enumerate() {
        limbs[i / 8] = (limbs[i / 8] << 8) | u64::from(*b);
    }
    let mut groups: Vec<u128> = Vec::new();
    loop {
        let mut rem: u128 = 0;
        for limb in &mut limbs {
            let cur = (rem << 64) | u128::from(*limb);
            *limb = (cur / CHUNK) as u64;
            rem = cur % CHUNK;
        }
        groups.push(rem);
        if limbs.iter().all(|&l| l == 0) {
            break;
        }
    }
    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            let _ = write!(out, "{group}");
        } else {
            let _ = write!(out, "{group:019}");
        }
    }
    out
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", decimal_magnitude(self.magnitude()))
        } else {
            write!(f, "{}", decimal_magnitude(self.magnitude()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_display_is_hex() {
        let id = AccountId::from_bytes([0xab; 20]);
        let s = format!("{id}");
        assert!(s.starts_with("0xabab"));
        assert_eq!(s.len(), 2 + 40);
    }

    #[test]
    fn account_id_zero_sentinel() {
        assert!(AccountId::ZERO.is_zero());
        assert!(!AccountId::from_bytes([1; 20]).is_zero());
    }

    #[test]
    fn market_id_next() {
        assert_eq!(MarketId(1).next(), MarketId(2));
        assert!(MarketId(0).is_zero());
    }

    #[test]
    fn order_id_is_deterministic() {
        let trader = AccountId::from_bytes([7; 20]);
        let a = OrderId::derive(trader, MarketId(1), OrderSide::Buy, 500, 25, 10);
        let b = OrderId::derive(trader, MarketId(1), OrderSide::Buy, 500, 25, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn order_id_varies_with_every_parameter() {
        let trader = AccountId::from_bytes([7; 20]);
        let base = OrderId::derive(trader, MarketId(1), OrderSide::Buy, 500, 25, 10);
        let variants = [
            OrderId::derive(AccountId::from_bytes([8; 20]), MarketId(1), OrderSide::Buy, 500, 25, 10),
            OrderId::derive(trader, MarketId(2), OrderSide::Buy, 500, 25, 10),
            OrderId::derive(trader, MarketId(1), OrderSide::Sell, 500, 25, 10),
            OrderId::derive(trader, MarketId(1), OrderSide::Buy, 501, 25, 10),
            OrderId::derive(trader, MarketId(1), OrderSide::Buy, 500, 26, 10),
            OrderId::derive(trader, MarketId(1), OrderSide::Buy, 500, 25, 11),
        ];
        for v in variants {
            assert_ne!(base, v);
        }
    }

    #[test]
    fn signed_display_minus_one() {
        // All-ones is -1 in two's complement.
        let id = OrderId::from_bytes([0xff; 32]);
        assert!(id.is_negative());
        assert_eq!(format!("{id}"), "-1");
    }

    #[test]
    fn signed_display_small_positive() {
        let mut bytes = [0u8; 32];
        bytes[31] = 42;
        let id = OrderId::from_bytes(bytes);
        assert!(!id.is_negative());
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn signed_display_u64_boundary() {
        // 2^64 = 18446744073709551616 crosses the limb boundary.
        let mut bytes = [0u8; 32];
        bytes[23] = 1;
        let id = OrderId::from_bytes(bytes);
        assert_eq!(format!("{id}"), "18446744073709551616");
    }

    #[test]
    fn signed_display_most_negative() {
        // 0x80...00 is -2^255.
        let mut bytes = [0u8; 32];
        bytes[0] = 0x80;
        let id = OrderId::from_bytes(bytes);
        assert!(id.is_negative());
        let s = format!("{id}");
        assert!(s.starts_with('-'));
        // -2^255 has 77 decimal digits.
        assert_eq!(s.len(), 78);
        assert!(s.ends_with("968"), "got {s}");
    }

    #[test]
    fn hex_rendering_is_raw_digest() {
        let id = OrderId::from_bytes([0xff; 32]);
        assert_eq!(id.to_hex(), "f".repeat(64));
        assert_eq!(id.short(), "ffffffff");
    }

    #[test]
    fn serde_roundtrips() {
        let trader = AccountId::from_bytes([3; 20]);
        let id = OrderId::derive(trader, MarketId(1), OrderSide::Sell, 9, 9, 9);
        let json = serde_json::to_string(&id).unwrap();
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let json = serde_json::to_string(&trader).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(trader, back);
    }
}
