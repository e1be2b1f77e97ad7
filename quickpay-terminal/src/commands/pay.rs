use std::io::Write;

use alloy_network::EthereumWallet;
use alloy_provider::ProviderBuilder;
use quickpay::amount::format_units;
use quickpay::ledger::{PaymentLedger, ScanDevice};
use quickpay::lifecycle::{FlowError, FlowObserver, PaymentFlow, PaymentStep};
use quickpay::session::WalletSession;
use quickpay_evm::EvmPaymentLedger;
use tokio::io::AsyncRead;

use super::wallet_signer;
use crate::config::{ChainArgs, PayArgs};
use crate::console::Console;
use crate::error::TerminalError;
use crate::scanner::KeyboardScanner;

/// Logs every step change.
#[derive(Debug, Clone, Copy)]
struct StepLogger;

impl FlowObserver for StepLogger {
    fn on_transition(&mut self, from: PaymentStep, to: PaymentStep) {
        tracing::info!(%from, %to, "Payment step");
    }

    fn on_failure(&mut self, step: PaymentStep, message: &str) {
        tracing::warn!(%step, error = message, "Payment step failed");
    }
}

/// `pay`: scans a payload, approves if needed, and pays.
///
/// # Errors
///
/// Returns an error if no wallet is configured or the console fails.
pub async fn pay(chain: &ChainArgs, args: &PayArgs) -> Result<(), TerminalError> {
    let signer = wallet_signer(chain)?.ok_or(TerminalError::MissingPrivateKey)?;
    let account = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(chain.rpc_url.clone());
    let ledger = EvmPaymentLedger::new(provider, chain.quickpay_address, chain.token_address);
    let session = WalletSession::connected(account.to_checksum(None), chain.payment_token());
    tracing::info!(account = %account, token = %chain.token_address, "Wallet connected");

    let flow =
        PaymentFlow::new(session, ledger, KeyboardScanner::default()).with_observer(StepLogger);
    drive(flow, &mut Console::stdio(), args).await
}

/// Runs the flow until the buyer stops or input ends.
///
/// Every failure is shown and the flow stays where it was; the buyer decides
/// whether to try again.
pub async fn drive<L, D, R, W>(
    mut flow: PaymentFlow<L, D>,
    console: &mut Console<R, W>,
    args: &PayArgs,
) -> Result<(), TerminalError>
where
    L: PaymentLedger,
    D: ScanDevice,
    R: AsyncRead + Unpin,
    W: Write,
    TerminalError: From<FlowError<L::Error>>,
{
    let mut payload = args.payload.clone();
    let symbol = flow.session().token().symbol.clone();
    flow.start_scanning()?;

    loop {
        let step = flow.step();
        let result = match step {
            PaymentStep::Idle => {
                return Ok(());
            }
            PaymentStep::Scanning => {
                let text = match payload.take() {
                    Some(text) => text,
                    None => match console.prompt("Paste the scanned QR payload:").await? {
                        Some(text) => text,
                        None => return Ok(()),
                    },
                };
                if text.trim().is_empty() {
                    continue;
                }
                flow.submit_scan(&text).await
            }
            PaymentStep::Reviewing { .. } => flow.review().await,
            PaymentStep::Approving => {
                describe(console, &flow, &symbol)?;
                let question = "Approve the payment contract to spend this amount?";
                if !(args.yes || console.confirm(question).await?) {
                    return Ok(());
                }
                console.say("Approving... waiting for confirmation")?;
                let result = flow.approve().await;
                if let Some(approval) = flow.approval() {
                    console.say(format_args!("Approval confirmed: {}", approval.transaction))?;
                }
                result
            }
            PaymentStep::AwaitingAllowanceRefresh => flow.refresh_allowance().await,
            PaymentStep::Paying => {
                describe(console, &flow, &symbol)?;
                if !(args.yes || console.confirm("Pay now?").await?) {
                    return Ok(());
                }
                console.say("Paying... waiting for confirmation")?;
                flow.pay().await
            }
            PaymentStep::Succeeded => {
                if let Some(confirmation) = flow.confirmation() {
                    console.say(format_args!(
                        "Payment successful: {}",
                        confirmation.transaction
                    ))?;
                }
                if args.yes || !console.confirm("Make another payment?").await? {
                    return Ok(());
                }
                flow.make_another_payment().map(|()| PaymentStep::Scanning)
            }
        };

        if let Err(e) = result {
            console.say(format_args!("Error: {e}"))?;
            let retry = matches!(flow.step(), PaymentStep::Scanning)
                || (!args.yes && console.confirm("Try again?").await?);
            if !retry {
                return Ok(());
            }
        }
    }
}

fn describe<L, D, R, W>(
    console: &mut Console<R, W>,
    flow: &PaymentFlow<L, D>,
    symbol: &str,
) -> Result<(), TerminalError>
where
    L: PaymentLedger,
    D: ScanDevice,
    R: AsyncRead + Unpin,
    W: Write,
{
    if let Some(intent) = flow.intent() {
        console.say(format_args!("Seller:    {}", intent.seller()))?;
        console.say(format_args!("Amount:    {} {symbol}", intent.amount()))?;
        console.say(format_args!("Reference: {}", intent.reference()))?;
    }
    if let (Some(allowance), Some(amount)) = (flow.allowance(), flow.amount()) {
        console.say(format_args!(
            "Allowance: {} {symbol}",
            format_units(allowance.current_allowance, amount.decimals())
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use alloy_primitives::U256;
    use quickpay::ledger::Confirmation;
    use quickpay::session::PaymentToken;
    use quickpay_evm::LedgerError;

    use super::*;

    const PAYLOAD: &str = r#"{"seller":"0xABC","amount":"1","ref":"Book"}"#;

    #[derive(Debug, Default)]
    struct FakeChain {
        allowance: Mutex<U256>,
        calls: Mutex<Vec<String>>,
    }

    impl PaymentLedger for FakeChain {
        type Error = LedgerError;

        async fn allowance(&self, _owner: &str) -> Result<U256, LedgerError> {
            Ok(*self.allowance.lock().unwrap())
        }

        async fn approve(&self, amount: U256) -> Result<Confirmation, LedgerError> {
            *self.allowance.lock().unwrap() = amount;
            self.calls.lock().unwrap().push(format!("approve {amount}"));
            Ok(Confirmation::new("0xapprove"))
        }

        async fn pay_merchant(
            &self,
            seller: &str,
            amount: U256,
            reference: &str,
        ) -> Result<Confirmation, LedgerError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("pay {seller} {amount} {reference}"));
            Ok(Confirmation::new("0xpay"))
        }
    }

    fn flow(chain: &Arc<FakeChain>) -> PaymentFlow<Arc<FakeChain>, KeyboardScanner> {
        let token = PaymentToken {
            address: "0xUSDC".into(),
            decimals: 6,
            symbol: "USDC".into(),
        };
        PaymentFlow::new(
            WalletSession::connected("0xBuyer", token),
            Arc::clone(chain),
            KeyboardScanner::default(),
        )
    }

    fn output<R: AsyncRead + Unpin>(console: &Console<R, Vec<u8>>) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_auto_confirm_approves_then_pays() {
        let chain = Arc::new(FakeChain::default());
        let mut console = Console::new(&b""[..], Vec::new());
        let args = PayArgs {
            payload: Some(PAYLOAD.into()),
            yes: true,
        };
        drive(flow(&chain), &mut console, &args).await.unwrap();

        assert_eq!(
            *chain.calls.lock().unwrap(),
            vec!["approve 1000000".to_owned(), "pay 0xABC 1000000 Book".to_owned()]
        );
        assert!(output(&console).contains("Payment successful: 0xpay"));
        assert!(output(&console).contains("Approval confirmed: 0xapprove"));
    }

    #[tokio::test]
    async fn test_bad_scan_keeps_scanning() {
        let chain = Arc::new(FakeChain::default());
        *chain.allowance.lock().unwrap() = U256::from(5_000_000u64);
        let input = format!("not a qr code\n{PAYLOAD}\ny\nn\n");
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let args = PayArgs {
            payload: None,
            yes: false,
        };
        drive(flow(&chain), &mut console, &args).await.unwrap();

        let out = output(&console);
        assert!(out.contains("Error: invalid QR code format"));
        assert!(out.contains("Reference: Book"));
        assert!(out.contains("Make another payment?"));
        assert_eq!(
            *chain.calls.lock().unwrap(),
            vec!["pay 0xABC 1000000 Book".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_declined_approval_submits_nothing() {
        let chain = Arc::new(FakeChain::default());
        let mut console = Console::new(&b"n\n"[..], Vec::new());
        let args = PayArgs {
            payload: Some(PAYLOAD.into()),
            yes: false,
        };
        drive(flow(&chain), &mut console, &args).await.unwrap();
        assert!(chain.calls.lock().unwrap().is_empty());
        assert!(output(&console).contains("Approve the payment contract"));
    }
}
