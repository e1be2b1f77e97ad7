//! QuickPay terminal.
//!
//! # Usage
//!
//! ```bash
//! # Seller: show a QR code for 10 USDC and wait for the payment
//! quickpay-terminal sell --amount 10 --reference Book
//!
//! # Seller: prefill from the catalog
//! quickpay-terminal sell --product "PS5 Console"
//!
//! # Buyer: paste the scanned payload and pay it
//! quickpay-terminal pay
//!
//! # Configure logging level
//! RUST_LOG=debug quickpay-terminal watch
//! ```
//!
//! See [`quickpay_terminal::config`] for the environment variables.

use quickpay_terminal::commands;
use quickpay_terminal::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::load();

    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(
        rpc_url = %cli.chain.rpc_url,
        quickpay = %cli.chain.quickpay_address,
        token = %cli.chain.token_address,
        decimals = cli.chain.token_decimals,
        "Loaded configuration"
    );

    match &cli.command {
        Command::Sell(args) => commands::sell(&cli.chain, args).await?,
        Command::Pay(args) => commands::pay(&cli.chain, args).await?,
        Command::Catalog(args) => commands::catalog(args).await?,
        Command::Watch(args) => commands::watch(&cli.chain, args).await?,
    }
    Ok(())
}
