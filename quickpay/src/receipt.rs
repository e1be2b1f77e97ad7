//! Seller-side payment receipts.
//!
//! The payment contract emits `PaymentMade(payer, seller, amount, reference)`
//! for every settled payment. Chain crates decode those events into
//! [`PaymentReceived`]; the seller screen only cares about the ones addressed
//! to its own account.

use alloy_primitives::U256;

use crate::amount::format_units;

/// A payment observed on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceived {
    /// Account that paid.
    pub payer: String,
    /// Account that was paid.
    pub seller: String,
    /// Amount in token base units.
    pub amount: U256,
    /// Reference attached by the buyer's wallet.
    pub reference: String,
    /// Transaction that carried the payment, when known.
    pub transaction: Option<String>,
}

impl PaymentReceived {
    /// Whether this payment was made to `seller`. Addresses compare case-insensitively.
    #[must_use]
    pub fn is_for(&self, seller: &str) -> bool {
        self.seller.eq_ignore_ascii_case(seller)
    }

    /// The amount in human-readable units for a token with `decimals` precision.
    #[must_use]
    pub fn display_amount(&self, decimals: u8) -> String {
        format_units(self.amount, decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> PaymentReceived {
        PaymentReceived {
            payer: "0x1111111111111111111111111111111111111111".into(),
            seller: "0xAbCdEf0000000000000000000000000000000001".into(),
            amount: U256::from(10_000_000u64),
            reference: "Book".into(),
            transaction: None,
        }
    }

    #[test]
    fn test_is_for_ignores_checksum_case() {
        let receipt = receipt();
        assert!(receipt.is_for("0xabcdef0000000000000000000000000000000001"));
        assert!(receipt.is_for("0xABCDEF0000000000000000000000000000000001"));
        assert!(!receipt.is_for("0x1111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_display_amount() {
        assert_eq!(receipt().display_amount(6), "10");
    }
}
