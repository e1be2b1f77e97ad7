use std::io::Write;
use std::time::Duration;

use alloy_provider::{Provider, ProviderBuilder};
use quickpay_evm::PaymentWatcher;
use tokio::io::AsyncRead;

use super::seller_account;
use crate::config::{ChainArgs, WatchArgs};
use crate::console::Console;
use crate::error::TerminalError;
use crate::signal::shutdown_signal;

/// `watch`: prints every payment to the seller until interrupted.
///
/// # Errors
///
/// Returns an error if no seller is known or polling the chain fails.
pub async fn watch(chain: &ChainArgs, args: &WatchArgs) -> Result<(), TerminalError> {
    let seller = seller_account(args.seller.as_deref(), chain)?
        .ok_or(TerminalError::MissingPrivateKey)?;
    let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
    let interval = Duration::from_secs(args.poll_secs);
    let mut watcher = PaymentWatcher::new(provider, chain.quickpay_address, &seller)?;
    if let Some(block) = args.from_block {
        watcher = watcher.from_block(block);
    }

    let mut console = Console::stdio();
    console.say(format_args!("Watching payments to {seller} (Ctrl-C to stop)"))?;
    tokio::select! {
        result = print_payments(&mut watcher, &mut console, chain, interval) => result,
        () = shutdown_signal() => Ok(()),
    }
}

async fn print_payments<P, R, W>(
    watcher: &mut PaymentWatcher<P>,
    console: &mut Console<R, W>,
    chain: &ChainArgs,
    interval: Duration,
) -> Result<(), TerminalError>
where
    P: Provider,
    R: AsyncRead + Unpin,
    W: Write,
{
    loop {
        for payment in watcher.poll().await? {
            console.say(format_args!(
                "Received {} {} from {} ref \"{}\"{}",
                payment.display_amount(chain.token_decimals),
                chain.token_symbol,
                payment.payer,
                payment.reference,
                payment
                    .transaction
                    .as_deref()
                    .map(|tx| format!(" tx {tx}"))
                    .unwrap_or_default()
            ))?;
        }
        tokio::time::sleep(interval).await;
    }
}
