//! Spending-allowance policy.
//!
//! Before the payment contract can pull tokens from the buyer, the buyer must
//! have granted it an ERC-20 allowance at least as large as the payment.

use alloy_primitives::U256;

/// Returns `true` when an approval transaction is required before paying.
///
/// Approval is needed exactly when the current allowance is below the
/// required amount; an allowance equal to the amount is sufficient.
#[must_use]
pub fn needs_approval(current_allowance: U256, required_amount: U256) -> bool {
    current_allowance < required_amount
}

/// Allowance snapshot for one payment, both values in token base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceState {
    /// Allowance currently granted to the payment contract.
    pub current_allowance: U256,
    /// Amount the pending payment will transfer.
    pub required_amount: U256,
}

impl AllowanceState {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(current_allowance: U256, required_amount: U256) -> Self {
        Self {
            current_allowance,
            required_amount,
        }
    }

    /// Whether this snapshot requires an approval step.
    #[must_use]
    pub fn needs_approval(&self) -> bool {
        needs_approval(self.current_allowance, self.required_amount)
    }

    /// Returns a copy with a refreshed allowance value.
    #[must_use]
    pub const fn with_allowance(self, current_allowance: U256) -> Self {
        Self {
            current_allowance,
            required_amount: self.required_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_approval_below_amount() {
        assert!(needs_approval(U256::ZERO, U256::from(1_000_000u64)));
        assert!(needs_approval(U256::from(999_999u64), U256::from(1_000_000u64)));
    }

    #[test]
    fn test_equal_allowance_is_sufficient() {
        let r = U256::from(5_000_000u64);
        assert!(!needs_approval(r, r));
    }

    #[test]
    fn test_excess_allowance_is_sufficient() {
        assert!(!needs_approval(U256::MAX, U256::from(1u64)));
        assert!(!needs_approval(U256::ZERO, U256::ZERO));
    }

    #[test]
    fn test_state_refresh_keeps_required_amount() {
        let state = AllowanceState::new(U256::ZERO, U256::from(10u64));
        assert!(state.needs_approval());
        let refreshed = state.with_allowance(U256::from(10u64));
        assert_eq!(refreshed.required_amount, U256::from(10u64));
        assert!(!refreshed.needs_approval());
    }
}
