//! QuickPay terminal.
//!
//! A command-line stand-in for the seller and buyer screens: the seller
//! renders a payment QR code in the terminal and waits for the matching
//! `PaymentMade` event, the buyer pastes the scanned payload and is walked
//! through approval and payment.
//!
//! # Modules
//!
//! - [`commands`] - `sell`, `pay`, `catalog` and `watch` subcommands
//! - [`config`] - Command-line and environment configuration
//! - [`console`] - Line-based prompts
//! - [`error`] - Terminal error type
//! - [`scanner`] - Keyboard-backed scan device
//! - [`signal`] - Ctrl-C and SIGTERM handling

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod scanner;
pub mod signal;

pub use config::{Cli, Command};
pub use error::TerminalError;
