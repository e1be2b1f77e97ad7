//! Terminal configuration.
//!
//! Every option can be given on the command line or through the environment.
//! A `.env` file in the working directory is loaded before parsing.
//!
//! # Environment Variables
//!
//! - `RPC_URL` - JSON-RPC endpoint (default: Avalanche Fuji public RPC)
//! - `QUICKPAY_ADDRESS` - Payment contract address
//! - `MOCK_USDC_ADDRESS` - Payment token address
//! - `TOKEN_DECIMALS` - Payment token decimals (default: `6`)
//! - `PRIVATE_KEY` - Wallet key used to sign approvals and payments
//! - `CATALOG_URL` - Catalog API base URL
//! - `FB_CATALOG_ID` - Catalog identifier
//! - `FB_ACCESS_TOKEN` - Catalog access token
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};
use quickpay::session::{DEFAULT_TOKEN_DECIMALS, PaymentToken};
use quickpay_evm::{AVALANCHE_FUJI_RPC_URL, DEFAULT_MOCK_USDC_ADDRESS, DEFAULT_QUICKPAY_ADDRESS};
use quickpay_http::CatalogConfig;
use quickpay_http::catalog::DEFAULT_CATALOG_URL;
use url::Url;

/// Face-to-face QR payments with an ERC-20 token.
#[derive(Debug, Parser)]
#[command(name = "quickpay-terminal", version, about)]
pub struct Cli {
    /// Chain and wallet settings.
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads `.env` if present, then parses the process arguments.
    #[must_use]
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a payment QR code and wait for the payment.
    Sell(SellArgs),
    /// Scan a payment QR payload and pay it.
    Pay(PayArgs),
    /// List products from the catalog.
    Catalog(CatalogArgs),
    /// Print payments received by a seller until interrupted.
    Watch(WatchArgs),
}

/// Chain and wallet settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ChainArgs {
    /// JSON-RPC endpoint.
    #[arg(long, env = "RPC_URL", default_value = AVALANCHE_FUJI_RPC_URL, global = true)]
    pub rpc_url: Url,

    /// Payment contract address.
    #[arg(long, env = "QUICKPAY_ADDRESS", default_value_t = DEFAULT_QUICKPAY_ADDRESS, global = true)]
    pub quickpay_address: Address,

    /// Payment token address.
    #[arg(long, env = "MOCK_USDC_ADDRESS", default_value_t = DEFAULT_MOCK_USDC_ADDRESS, global = true)]
    pub token_address: Address,

    /// Payment token decimals.
    #[arg(long, env = "TOKEN_DECIMALS", default_value_t = DEFAULT_TOKEN_DECIMALS, global = true)]
    pub token_decimals: u8,

    /// Payment token symbol, for display.
    #[arg(long, env = "TOKEN_SYMBOL", default_value = "USDC", global = true)]
    pub token_symbol: String,

    /// Wallet private key (hex).
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,
}

impl ChainArgs {
    /// The configured payment token.
    #[must_use]
    pub fn payment_token(&self) -> PaymentToken {
        PaymentToken {
            address: self.token_address.to_checksum(None),
            decimals: self.token_decimals,
            symbol: self.token_symbol.clone(),
        }
    }
}

/// Catalog settings.
#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    /// Catalog API base URL.
    #[arg(long, env = "CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Catalog identifier.
    #[arg(long, env = "FB_CATALOG_ID", default_value = "")]
    pub catalog_id: String,

    /// Catalog access token.
    #[arg(long, env = "FB_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,
}

impl CatalogArgs {
    /// Builds the catalog client configuration.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(&self.catalog_id, &self.access_token).with_base_url(&self.catalog_url)
    }
}

/// Arguments of `sell`.
#[derive(Debug, Clone, Args)]
pub struct SellArgs {
    /// Amount in token units, e.g. `10` or `2.50`.
    #[arg(long)]
    pub amount: Option<String>,

    /// Item reference shown to the buyer.
    #[arg(long)]
    pub reference: Option<String>,

    /// Prefill amount and reference from a catalog product (id, name or list number).
    #[arg(long)]
    pub product: Option<String>,

    /// Account to be paid. Defaults to the `PRIVATE_KEY` address.
    #[arg(long)]
    pub seller: Option<String>,

    /// Also write the QR code as SVG to this file.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Exit after showing the QR code instead of waiting for the payment.
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds between two checks for the payment.
    #[arg(long, default_value_t = 2)]
    pub poll_secs: u64,

    /// Catalog settings, used with `--product`.
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl SellArgs {
    /// Delay between two polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}

/// Arguments of `pay`.
#[derive(Debug, Clone, Args)]
pub struct PayArgs {
    /// QR payload to pay. Read from standard input when omitted.
    #[arg(long)]
    pub payload: Option<String>,

    /// Submit approval and payment without asking for confirmation.
    #[arg(long, short)]
    pub yes: bool,
}

/// Arguments of `watch`.
#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    /// Seller to watch. Defaults to the `PRIVATE_KEY` address.
    #[arg(long)]
    pub seller: Option<String>,

    /// First block to scan. Defaults to the current head.
    #[arg(long)]
    pub from_block: Option<u64>,

    /// Seconds between two polls.
    #[arg(long, default_value_t = 2)]
    pub poll_secs: u64,
}
