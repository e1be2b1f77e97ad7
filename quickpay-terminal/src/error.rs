//! Error type for the terminal.

use quickpay::lifecycle::FlowError;
use quickpay::qr::QrError;
use quickpay::sale::SaleError;
use quickpay_evm::LedgerError;

/// Errors that end a terminal command.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// The command needs a wallet but no private key is configured.
    #[error("PRIVATE_KEY is not set; connect a wallet first")]
    MissingPrivateKey,
    /// The configured private key cannot be parsed.
    #[error("invalid PRIVATE_KEY: {0}")]
    InvalidPrivateKey(String),
    /// No catalog product matches the selection.
    #[error("no product matches `{0}`")]
    ProductNotFound(String),
    /// The sale form is incomplete.
    #[error(transparent)]
    Sale(#[from] SaleError),
    /// The payment flow failed.
    #[error(transparent)]
    Flow(#[from] FlowError<LedgerError>),
    /// A chain call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The payload does not fit in a QR code.
    #[error("cannot render QR code: {0}")]
    Qr(#[from] QrError),
    /// Reading from or writing to the console failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
