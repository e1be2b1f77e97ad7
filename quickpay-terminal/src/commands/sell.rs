use alloy_provider::ProviderBuilder;
use quickpay::qr::{QrStyle, render_svg, render_terminal};
use quickpay::sale::SaleDraft;
use quickpay::session::WalletSession;
use quickpay_evm::PaymentWatcher;

use super::{find_product, load_listing, seller_account};
use crate::config::{ChainArgs, SellArgs};
use crate::console::Console;
use crate::error::TerminalError;
use crate::signal::shutdown_signal;

/// Builds the sale form from the arguments. Explicit `--amount` and
/// `--reference` override a selected product.
async fn draft(args: &SellArgs) -> Result<SaleDraft, TerminalError> {
    let mut draft = SaleDraft::default();
    if let Some(query) = &args.product {
        let listing = load_listing(&args.catalog).await;
        let product = find_product(&listing.products, query)
            .ok_or_else(|| TerminalError::ProductNotFound(query.clone()))?;
        draft.select_product(product);
    }
    if let Some(amount) = &args.amount {
        draft.amount.clone_from(amount);
    }
    if let Some(reference) = &args.reference {
        draft.reference.clone_from(reference);
    }
    Ok(draft)
}

/// `sell`: shows the payment QR code, then waits for the payment.
///
/// # Errors
///
/// Returns an error if the sale is incomplete, no seller account is known,
/// or watching the chain fails.
pub async fn sell(chain: &ChainArgs, args: &SellArgs) -> Result<(), TerminalError> {
    let mut console = Console::stdio();
    let token = chain.payment_token();
    let session = match seller_account(args.seller.as_deref(), chain)? {
        Some(account) => WalletSession::connected(account, token),
        None => WalletSession::disconnected(token),
    };

    let intent = draft(args).await?.generate(&session)?;
    tracing::info!(
        seller = %intent.seller(),
        amount = %intent.amount(),
        reference = %intent.reference(),
        "Payment QR generated"
    );

    console.say(render_terminal(&intent)?)?;
    console.say(format_args!(
        "{} {} for \"{}\"",
        intent.amount(),
        session.token().symbol,
        intent.reference()
    ))?;
    console.say(format_args!("Payload: {}", intent.encode()))?;
    if let Some(path) = &args.svg {
        std::fs::write(path, render_svg(&intent, &QrStyle::default())?)?;
        console.say(format_args!("SVG written to {}", path.display()))?;
    }
    if args.no_wait {
        return Ok(());
    }

    let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
    let mut watcher = PaymentWatcher::new(provider, chain.quickpay_address, intent.seller())?
        .poll_interval(args.poll_interval());

    console.say("Waiting for payment... (Ctrl-C to stop)")?;
    tokio::select! {
        received = watcher.wait_for_payment() => {
            let payment = received?;
            console.say("PAYMENT RECEIVED!")?;
            console.say(format_args!(
                "Amount: {} {}",
                payment.display_amount(chain.token_decimals),
                session.token().symbol
            ))?;
            console.say(format_args!("Ref: {}", payment.reference))?;
            if let Some(tx) = &payment.transaction {
                console.say(format_args!("Transaction: {tx}"))?;
            }
        }
        () = shutdown_signal() => {
            console.say("Stopped waiting for payment.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::{Cli, Command};

    fn sell_args(args: &[&str]) -> SellArgs {
        let mut argv = vec!["quickpay-terminal", "sell", "--catalog-id", ""];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Sell(args) => args,
            _ => panic!("expected sell"),
        }
    }

    #[tokio::test]
    async fn test_draft_from_fallback_product() {
        let draft = draft(&sell_args(&["--product", "Tote Bag"])).await.unwrap();
        assert_eq!(draft.amount, "15.00");
        assert_eq!(draft.reference, "Tote Bag");
    }

    #[tokio::test]
    async fn test_explicit_fields_override_product() {
        let draft = draft(&sell_args(&["--product", "2", "--amount", "3"]))
            .await
            .unwrap();
        assert_eq!(draft.amount, "3");
        assert_eq!(draft.reference, "Croissant");
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let result = draft(&sell_args(&["--product", "Bagel"])).await;
        assert!(matches!(result, Err(TerminalError::ProductNotFound(q)) if q == "Bagel"));
    }
}
