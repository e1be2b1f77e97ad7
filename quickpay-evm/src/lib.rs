#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EVM support for QuickPay.
//!
//! Implements the [`quickpay::ledger::PaymentLedger`] seam on top of an alloy
//! [`Provider`](alloy_provider::Provider) and lets a seller watch the payment
//! contract for incoming `PaymentMade` events.
//!
//! - [`contract`] - `IERC20` and `IQuickPay` bindings
//! - [`EvmPaymentLedger`] - allowance reads, approvals and `payMerchant` calls
//! - [`PaymentWatcher`] - polling for payments to a seller
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits tracing spans around submitted transactions

pub mod contract;
mod error;
mod ledger;
mod networks;
pub mod watcher;

pub use error::LedgerError;
pub use ledger::EvmPaymentLedger;
pub use networks::*;
pub use watcher::PaymentWatcher;
