//! [`PaymentLedger`] over an alloy provider.
//!
//! The provider must carry a wallet: `approve` and `payMerchant` are sent from
//! the provider's default signer, and `allowance` is read against the payment
//! contract as spender.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionReceipt;
use quickpay::ledger::{Confirmation, PaymentLedger};

use crate::contract::{IERC20, IQuickPay};
use crate::error::{LedgerError, parse_address};
use crate::networks::NetworkConfig;

/// Awaits a future, optionally instrumenting it with a tracing span.
macro_rules! traced {
    ($fut:expr, $span:expr) => {{
        #[cfg(feature = "telemetry")]
        {
            use tracing::Instrument;
            $fut.instrument($span).await
        }
        #[cfg(not(feature = "telemetry"))]
        {
            $fut.await
        }
    }};
}

/// Talks to the token and payment contracts through `P`.
#[derive(Debug, Clone)]
pub struct EvmPaymentLedger<P> {
    provider: P,
    quickpay: Address,
    token: Address,
}

impl<P: Provider> EvmPaymentLedger<P> {
    /// Creates a ledger for the given payment contract and token.
    pub const fn new(provider: P, quickpay: Address, token: Address) -> Self {
        Self {
            provider,
            quickpay,
            token,
        }
    }

    /// Creates a ledger for a known network's deployments.
    pub const fn for_network(provider: P, network: &NetworkConfig) -> Self {
        Self::new(provider, network.quickpay, network.token)
    }

    /// The payment contract address.
    pub const fn quickpay(&self) -> Address {
        self.quickpay
    }

    /// The token contract address.
    pub const fn token(&self) -> Address {
        self.token
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Reads the token's decimals from chain.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the call fails.
    pub async fn token_decimals(&self) -> Result<u8, LedgerError> {
        let erc20 = IERC20::new(self.token, &self.provider);
        Ok(erc20.decimals().call().await?)
    }

    /// Reads `owner`'s token balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if `owner` is not an address or the call fails.
    pub async fn balance_of(&self, owner: &str) -> Result<U256, LedgerError> {
        let owner = parse_address(owner)?;
        let erc20 = IERC20::new(self.token, &self.provider);
        Ok(erc20.balanceOf(owner).call().await?)
    }
}

impl<P: Provider> PaymentLedger for EvmPaymentLedger<P> {
    type Error = LedgerError;

    async fn allowance(&self, owner: &str) -> Result<U256, LedgerError> {
        let owner = parse_address(owner)?;
        let erc20 = IERC20::new(self.token, &self.provider);
        Ok(erc20.allowance(owner, self.quickpay).call().await?)
    }

    async fn approve(&self, amount: U256) -> Result<Confirmation, LedgerError> {
        let erc20 = IERC20::new(self.token, &self.provider);
        let call = erc20.approve(self.quickpay, amount);
        let receipt = traced!(
            async { call.send().await?.get_receipt().await.map_err(LedgerError::from) },
            tracing::info_span!("call_approve",
                token = %self.token,
                spender = %self.quickpay,
                amount = %amount,
                otel.kind = "client",
            )
        )?;
        confirmed(&receipt, "approve")
    }

    async fn pay_merchant(
        &self,
        seller: &str,
        amount: U256,
        reference: &str,
    ) -> Result<Confirmation, LedgerError> {
        let seller = parse_address(seller)?;
        let contract = IQuickPay::new(self.quickpay, &self.provider);
        let call = contract.payMerchant(seller, amount, reference.to_owned());
        let receipt = traced!(
            async { call.send().await?.get_receipt().await.map_err(LedgerError::from) },
            tracing::info_span!("call_payMerchant",
                contract = %self.quickpay,
                seller = %seller,
                amount = %amount,
                otel.kind = "client",
            )
        )?;
        confirmed(&receipt, "payMerchant")
    }
}

/// Turns a mined receipt into a [`Confirmation`], failing on revert.
#[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
fn confirmed(receipt: &TransactionReceipt, call: &str) -> Result<Confirmation, LedgerError> {
    if receipt.status() {
        #[cfg(feature = "telemetry")]
        tracing::info!(
            status = "ok",
            tx = %receipt.transaction_hash,
            "{call} succeeded"
        );
        Ok(Confirmation::new(receipt.transaction_hash.to_string()))
    } else {
        #[cfg(feature = "telemetry")]
        tracing::warn!(
            status = "failed",
            tx = %receipt.transaction_hash,
            "{call} reverted"
        );
        Err(LedgerError::Reverted(receipt.transaction_hash))
    }
}
