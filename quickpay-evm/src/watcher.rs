//! Seller-side detection of `PaymentMade` events.
//!
//! The watcher polls `eth_getLogs` for `PaymentMade` logs emitted by the
//! payment contract with the seller as the indexed `seller` topic. Each poll
//! covers the blocks mined since the previous one.

use std::time::Duration;

use alloy_primitives::{Address, BlockNumber};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use quickpay::receipt::PaymentReceived;

use crate::contract::IQuickPay::PaymentMade;
use crate::error::{LedgerError, parse_address};

/// Default delay between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Builds the log filter for payments to `seller` from `from_block` onwards.
#[must_use]
pub fn payment_filter(quickpay: Address, seller: Address, from_block: BlockNumber) -> Filter {
    Filter::new()
        .address(quickpay)
        .event_signature(PaymentMade::SIGNATURE_HASH)
        .topic2(seller.into_word())
        .from_block(from_block)
}

/// Decodes a `PaymentMade` log.
///
/// # Errors
///
/// Returns [`LedgerError::EventDecode`] if the log is not a `PaymentMade` event.
pub fn decode_payment(log: &Log) -> Result<PaymentReceived, LedgerError> {
    let decoded = log.log_decode::<PaymentMade>()?;
    let event = decoded.inner.data;
    Ok(PaymentReceived {
        payer: event.payer.to_checksum(None),
        seller: event.seller.to_checksum(None),
        amount: event.amount,
        reference: event.reference,
        transaction: log.transaction_hash.map(|hash| hash.to_string()),
    })
}

/// Polls the chain for payments made to one seller.
#[derive(Debug)]
pub struct PaymentWatcher<P> {
    provider: P,
    quickpay: Address,
    seller: Address,
    next_block: Option<BlockNumber>,
    poll_interval: Duration,
}

impl<P: Provider> PaymentWatcher<P> {
    /// Creates a watcher for payments to `seller` through the `quickpay` contract.
    ///
    /// Unless [`from_block`](Self::from_block) is set, only payments mined
    /// after the first poll are reported.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAddress`] if `seller` is not an address.
    pub fn new(provider: P, quickpay: Address, seller: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            provider,
            quickpay,
            seller: parse_address(seller)?,
            next_block: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Starts watching at `block` instead of the current head.
    #[must_use]
    pub const fn from_block(mut self, block: BlockNumber) -> Self {
        self.next_block = Some(block);
        self
    }

    /// Sets the delay between polls.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The watched seller.
    pub const fn seller(&self) -> Address {
        self.seller
    }

    /// Fetches payments mined since the previous poll.
    ///
    /// Logs that match the filter but do not decode as `PaymentMade` are
    /// skipped. The cursor only moves once the whole range has been read.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the RPC fails. The same range is retried on
    /// the next poll.
    pub async fn poll(&mut self) -> Result<Vec<PaymentReceived>, LedgerError> {
        let head = self.provider.get_block_number().await?;
        let Some(from) = self.next_block else {
            self.next_block = Some(head + 1);
            return Ok(Vec::new());
        };
        if from > head {
            return Ok(Vec::new());
        }

        let filter = payment_filter(self.quickpay, self.seller, from).to_block(head);
        let logs = self.provider.get_logs(&filter).await?;

        let seller = self.seller.to_string();
        let payments = logs
            .iter()
            .filter(|log| !log.removed)
            .filter_map(|log| match decode_payment(log) {
                Ok(payment) => Some(payment),
                Err(e) => {
                    #[cfg(feature = "telemetry")]
                    tracing::warn!(
                        tx = ?log.transaction_hash,
                        error = %e,
                        "Skipping undecodable payment log"
                    );
                    #[cfg(not(feature = "telemetry"))]
                    let _ = e;
                    None
                }
            })
            .filter(|payment| payment.is_for(&seller))
            .inspect(|payment| {
                #[cfg(feature = "telemetry")]
                tracing::info!(
                    payer = %payment.payer,
                    amount = %payment.amount,
                    reference = %payment.reference,
                    "Payment received"
                );
                #[cfg(not(feature = "telemetry"))]
                let _ = payment;
            })
            .collect();
        self.next_block = Some(head + 1);
        Ok(payments)
    }

    /// Polls until a payment arrives and returns the first one.
    ///
    /// The wait is unbounded; drop the future to stop watching.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if a poll fails.
    pub async fn wait_for_payment(&mut self) -> Result<PaymentReceived, LedgerError> {
        loop {
            let mut payments = self.poll().await?;
            if !payments.is_empty() {
                return Ok(payments.swap_remove(0));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
