//! Error types for EVM ledger operations.

use alloy_primitives::TxHash;
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;

/// Errors returned by [`EvmPaymentLedger`](crate::EvmPaymentLedger) and
/// [`PaymentWatcher`](crate::PaymentWatcher).
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An account string is not a valid EVM address.
    #[error("Invalid address `{0}`")]
    InvalidAddress(String),
    /// RPC transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Waiting for the transaction receipt failed.
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    /// On-chain transaction was reverted.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),
    /// Contract call failed.
    #[error("Contract call failed: {0}")]
    ContractCall(String),
    /// A `PaymentMade` log could not be decoded.
    #[error("Invalid PaymentMade log: {0}")]
    EventDecode(#[from] alloy_sol_types::Error),
}

impl From<alloy_contract::Error> for LedgerError {
    fn from(e: alloy_contract::Error) -> Self {
        match e {
            alloy_contract::Error::UnknownFunction(_)
            | alloy_contract::Error::UnknownSelector(_)
            | alloy_contract::Error::NotADeploymentTransaction
            | alloy_contract::Error::ContractNotDeployed
            | alloy_contract::Error::ZeroData(_, _)
            | alloy_contract::Error::AbiError(_) => Self::ContractCall(e.to_string()),
            alloy_contract::Error::TransportError(e) => Self::Transport(e),
            alloy_contract::Error::PendingTransactionError(e) => Self::PendingTransaction(e),
        }
    }
}

/// Parses a user-supplied account string.
pub(crate) fn parse_address(value: &str) -> Result<alloy_primitives::Address, LedgerError> {
    value
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidAddress(value.to_owned()))
}
