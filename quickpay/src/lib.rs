#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for QuickPay face-to-face payments.
//!
//! A seller turns an amount and a reference into a QR code. A buyer scans it,
//! approves the payment contract to move the token if needed, and pays. The
//! seller watches the chain for the resulting `PaymentMade` event.
//!
//! This crate is chain-agnostic. On-chain access is abstracted behind
//! [`ledger::PaymentLedger`] and implemented in `quickpay-evm`; the product
//! catalog transport lives in `quickpay-http`.
//!
//! # Modules
//!
//! - [`allowance`] - Whether an approval is needed before paying
//! - [`amount`] - Human-readable to base-unit token amounts
//! - [`catalog`] - Products, price normalization and the fallback list
//! - [`intent`] - Payment intents and the QR payload format
//! - [`ledger`] - Seams to the payment contract and the scanning device
//! - [`lifecycle`] - The buyer's scan, approve and pay state machine
//! - [`receipt`] - Payments observed by the seller
//! - [`sale`] - The seller's sale form
//! - [`session`] - Connected wallet and payment token
//! - `qr` - QR rendering (requires the `qrcode` feature)
//!
//! # Feature Flags
//!
//! - `qrcode` - Enables QR rendering to SVG and terminal text
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod allowance;
pub mod amount;
pub mod catalog;
pub mod intent;
pub mod ledger;
pub mod lifecycle;
#[cfg(feature = "qrcode")]
pub mod qr;
pub mod receipt;
pub mod sale;
pub mod session;

pub use intent::PaymentIntent;
pub use lifecycle::{PaymentFlow, PaymentStep};
