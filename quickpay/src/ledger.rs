//! Collaborator traits for the buyer-side payment flow.
//!
//! The lifecycle in [`crate::lifecycle`] never talks to a chain or a camera
//! directly. It drives a [`PaymentLedger`] (token allowance, approval and
//! payment transactions) and a [`ScanDevice`] (the camera feeding QR payloads).
//! Chain-specific crates implement the ledger; `quickpay-evm` provides the
//! EVM one.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::U256;

/// Proof that a submitted transaction was confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Transaction hash as reported by the chain.
    pub transaction: String,
}

impl Confirmation {
    /// Creates a confirmation for the given transaction hash.
    #[must_use]
    pub fn new(transaction: impl Into<String>) -> Self {
        Self {
            transaction: transaction.into(),
        }
    }
}

/// On-chain operations needed to pay a merchant with an ERC-20 token.
///
/// `approve` and `pay_merchant` resolve only once the transaction is
/// confirmed. They may wait indefinitely; no timeout is applied here.
pub trait PaymentLedger {
    /// Error type for ledger operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the allowance `owner` has granted to the payment contract.
    fn allowance(&self, owner: &str) -> impl Future<Output = Result<U256, Self::Error>> + Send;

    /// Approves the payment contract to spend `amount` base units.
    fn approve(&self, amount: U256)
    -> impl Future<Output = Result<Confirmation, Self::Error>> + Send;

    /// Pays `amount` base units to `seller` through the payment contract.
    fn pay_merchant(
        &self,
        seller: &str,
        amount: U256,
        reference: &str,
    ) -> impl Future<Output = Result<Confirmation, Self::Error>> + Send;
}

impl<T: PaymentLedger + Send + Sync> PaymentLedger for Arc<T> {
    type Error = T::Error;

    fn allowance(&self, owner: &str) -> impl Future<Output = Result<U256, Self::Error>> + Send {
        (**self).allowance(owner)
    }

    fn approve(
        &self,
        amount: U256,
    ) -> impl Future<Output = Result<Confirmation, Self::Error>> + Send {
        (**self).approve(amount)
    }

    fn pay_merchant(
        &self,
        seller: &str,
        amount: U256,
        reference: &str,
    ) -> impl Future<Output = Result<Confirmation, Self::Error>> + Send {
        (**self).pay_merchant(seller, amount, reference)
    }
}

/// A camera (or any other source) producing QR payloads.
///
/// Only one scan session may drive the device at a time; the payment flow
/// pairs every `start` with exactly one `stop`.
pub trait ScanDevice {
    /// Starts a scan session.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be acquired.
    fn start(&mut self) -> std::io::Result<()>;

    /// Stops the running scan session and releases the device.
    fn stop(&mut self);
}
