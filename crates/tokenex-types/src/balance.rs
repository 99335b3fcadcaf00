//! Custodial balance view for the tokenex escrow model.
//!
//! Each trader has, per market, an `available` token balance (usable for
//! SELL placements and withdrawal) and a `reserved` quantity locked in
//! that trader's open SELL orders.

use serde::{Deserialize, Serialize};

/// Snapshot of a trader's custodial position in one market.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubBalance {
    /// Available for new SELL orders / withdrawal.
    pub available: u128,
    /// Locked in the trader's open SELL orders.
    pub reserved: u128,
}

impl SubBalance {
    /// Create a zero balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: 0,
            reserved: 0,
        }
    }

    /// Total custodied quantity (available + reserved).
    #[must_use]
    pub fn total(&self) -> u128 {
        self.available + self.reserved
    }

    /// Whether this entry has no balance at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available == 0 && self.reserved == 0
    }
}

impl Default for SubBalance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let bal = SubBalance::default();
        assert!(bal.is_zero());
        assert_eq!(bal.total(), 0);
    }

    #[test]
    fn total_sums_both_parts() {
        let bal = SubBalance {
            available: 100,
            reserved: 50,
        };
        assert_eq!(bal.total(), 150);
        assert!(!bal.is_zero());
    }

    #[test]
    fn serde_roundtrip() {
        let bal = SubBalance {
            available: 12_345,
            reserved: 678,
        };
        let json = serde_json::to_string(&bal).unwrap();
        let back: SubBalance = serde_json::from_str(&json).unwrap();
        assert_eq!(bal, back);
    }
}
