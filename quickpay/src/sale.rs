//! Seller-side sale form.

use crate::amount::{AmountError, TokenAmount};
use crate::catalog::Product;
use crate::intent::{IntentError, PaymentIntent};
use crate::session::WalletSession;

/// Errors raised when generating a payment intent from a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaleError {
    /// The seller has no connected wallet.
    #[error("please connect wallet first")]
    NotConnected,
    /// The draft does not form a valid intent.
    #[error(transparent)]
    Intent(#[from] IntentError),
    /// The amount is not payable in the session's token.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Amount and reference entered by the seller before a QR code is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleDraft {
    /// Amount in the token's human-readable denomination.
    pub amount: String,
    /// Item reference shown to the buyer.
    pub reference: String,
}

impl SaleDraft {
    /// Creates a draft from typed values.
    #[must_use]
    pub fn new(amount: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            reference: reference.into(),
        }
    }

    /// Prefills the draft from a catalog product.
    pub fn select_product(&mut self, product: &Product) {
        self.amount.clone_from(&product.price);
        self.reference.clone_from(&product.name);
    }

    /// Whether both fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.amount.trim().is_empty() && !self.reference.trim().is_empty()
    }

    /// Builds the intent to encode, paying the session's connected account.
    ///
    /// # Errors
    ///
    /// Returns [`SaleError::NotConnected`] without a connected account,
    /// [`SaleError::Intent`] if a field is empty or the reference is too long,
    /// or [`SaleError::Amount`] if the buyer could not pay the amount.
    pub fn generate(&self, session: &WalletSession) -> Result<PaymentIntent, SaleError> {
        let seller = session.account().ok_or(SaleError::NotConnected)?;
        let intent = PaymentIntent::new(seller, self.amount.trim(), self.reference.trim())?;
        TokenAmount::parse(intent.amount(), session.token().decimals)?;
        Ok(intent)
    }
}
