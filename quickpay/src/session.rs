//! Wallet session context.
//!
//! The connected account and the token being spent are passed explicitly to
//! every component that needs them, rather than read from ambient state.

use serde::{Deserialize, Serialize};

/// Decimal precision of the default payment token (USDC-style).
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Token used to settle payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    /// Token contract address.
    pub address: String,
    /// Number of decimals (e.g., 6 for USDC).
    pub decimals: u8,
    /// Display symbol.
    pub symbol: String,
}

/// A connected wallet and the token it pays with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    account: Option<String>,
    token: PaymentToken,
}

impl WalletSession {
    /// Creates a session for a connected account.
    #[must_use]
    pub fn connected(account: impl Into<String>, token: PaymentToken) -> Self {
        Self {
            account: Some(account.into()),
            token,
        }
    }

    /// Creates a session with no connected account.
    #[must_use]
    pub const fn disconnected(token: PaymentToken) -> Self {
        Self {
            account: None,
            token,
        }
    }

    /// The connected account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// The payment token.
    #[must_use]
    pub const fn token(&self) -> &PaymentToken {
        &self.token
    }
}
