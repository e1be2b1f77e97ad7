//! Buyer-side payment lifecycle.
//!
//! A [`PaymentFlow`] walks one buyer through a payment:
//!
//! ```text
//! Idle -> Scanning -> Reviewing -> Approving -> AwaitingAllowanceRefresh -> Paying -> Succeeded
//!                          \___________________________________________/^
//!                                 (allowance already sufficient)
//! Succeeded -- make_another_payment --> Scanning
//! ```
//!
//! Every step that talks to the chain is an `async fn` taking `&mut self`, so
//! an approval and a payment can never be in flight at the same time. When a
//! confirmation resolves, the flow re-evaluates the allowance policy explicitly
//! instead of relying on whatever happens to re-read the allowance next.
//!
//! Failures never move the flow backwards or forwards. The error is returned
//! and the flow stays where it was, waiting for the user to try again.

use std::fmt;

use crate::allowance::AllowanceState;
use crate::amount::{AmountError, TokenAmount};
use crate::intent::{self, DecodeError, PaymentIntent};
use crate::ledger::{Confirmation, PaymentLedger, ScanDevice};
use crate::session::WalletSession;

/// Where a [`PaymentFlow`] currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStep {
    /// Nothing started yet.
    Idle,
    /// The scan device is running and waiting for a QR payload.
    Scanning,
    /// A payload was decoded; `needs_approval` is `None` until the allowance is known.
    Reviewing {
        /// Outcome of the allowance policy, once evaluated.
        needs_approval: Option<bool>,
    },
    /// The allowance is too low; an approval transaction must be submitted.
    Approving,
    /// An approval was confirmed; the allowance must be read again.
    AwaitingAllowanceRefresh,
    /// The allowance covers the payment; the payment transaction can be submitted.
    Paying,
    /// The payment was confirmed on-chain.
    Succeeded,
}

impl PaymentStep {
    /// Short name of the step, used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Reviewing { .. } => "reviewing",
            Self::Approving => "approving",
            Self::AwaitingAllowanceRefresh => "awaiting_allowance_refresh",
            Self::Paying => "paying",
            Self::Succeeded => "succeeded",
        }
    }
}

impl fmt::Display for PaymentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors surfaced by [`PaymentFlow`] operations.
///
/// None of them are fatal; the flow stays in the step it was in.
#[derive(Debug, thiserror::Error)]
pub enum FlowError<E> {
    /// The operation is not allowed from the current step.
    #[error("cannot {action} while {step}")]
    InvalidTransition {
        /// The step the flow was in.
        step: PaymentStep,
        /// The attempted operation.
        action: &'static str,
    },
    /// No wallet account is connected.
    #[error("connect a wallet first")]
    NotConnected,
    /// The scanned payload is not a valid payment intent.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The scanned amount cannot be paid with this token.
    #[error("invalid QR code amount: {0}")]
    Amount(#[from] AmountError),
    /// The scan device could not be started.
    #[error("camera unavailable: {0}")]
    Device(#[from] std::io::Error),
    /// The ledger rejected or failed an operation.
    #[error("{0}")]
    Ledger(#[source] E),
}

/// Observes step changes of a [`PaymentFlow`].
///
/// All methods have no-op defaults; implement only the ones you need.
pub trait FlowObserver: Send {
    /// Called after every step change.
    fn on_transition(&mut self, _from: PaymentStep, _to: PaymentStep) {}

    /// Called when an operation fails and the flow stays in `step`.
    fn on_failure(&mut self, _step: PaymentStep, _message: &str) {}
}

/// The buyer-side state machine.
///
/// Owns the scan device for its whole lifetime. The device is started when the
/// flow enters [`PaymentStep::Scanning`] and stopped when it leaves it, or when
/// the flow is dropped.
pub struct PaymentFlow<L: PaymentLedger, D: ScanDevice> {
    session: WalletSession,
    ledger: L,
    device: D,
    device_active: bool,
    step: PaymentStep,
    intent: Option<PaymentIntent>,
    amount: Option<TokenAmount>,
    allowance: Option<AllowanceState>,
    approval: Option<Confirmation>,
    confirmation: Option<Confirmation>,
    observer: Option<Box<dyn FlowObserver>>,
}

impl<L: PaymentLedger, D: ScanDevice> fmt::Debug for PaymentFlow<L, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentFlow")
            .field("step", &self.step)
            .field("device_active", &self.device_active)
            .field("intent", &self.intent)
            .field("allowance", &self.allowance)
            .finish_non_exhaustive()
    }
}

impl<L: PaymentLedger, D: ScanDevice> PaymentFlow<L, D> {
    /// Creates an idle flow.
    #[must_use]
    pub const fn new(session: WalletSession, ledger: L, device: D) -> Self {
        Self {
            session,
            ledger,
            device,
            device_active: false,
            step: PaymentStep::Idle,
            intent: None,
            amount: None,
            allowance: None,
            approval: None,
            confirmation: None,
            observer: None,
        }
    }

    /// Attaches an observer notified of every step change.
    #[must_use]
    pub fn with_observer(mut self, observer: impl FlowObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The wallet session the flow pays from.
    #[must_use]
    pub const fn session(&self) -> &WalletSession {
        &self.session
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> PaymentStep {
        self.step
    }

    /// The scanned intent, once decoded.
    #[must_use]
    pub const fn intent(&self) -> Option<&PaymentIntent> {
        self.intent.as_ref()
    }

    /// The scanned amount converted to the session token.
    #[must_use]
    pub const fn amount(&self) -> Option<&TokenAmount> {
        self.amount.as_ref()
    }

    /// The latest allowance snapshot.
    #[must_use]
    pub const fn allowance(&self) -> Option<&AllowanceState> {
        self.allowance.as_ref()
    }

    /// Confirmation of the latest approval, if one was needed.
    #[must_use]
    pub const fn approval(&self) -> Option<&Confirmation> {
        self.approval.as_ref()
    }

    /// Confirmation of the completed payment.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Whether the scan device is currently running.
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        self.device_active
    }

    /// The underlying ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The underlying scan device.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Starts scanning from [`PaymentStep::Idle`].
    ///
    /// # Errors
    ///
    /// Fails if the flow is not idle or the scan device cannot be started.
    pub fn start_scanning(&mut self) -> Result<(), FlowError<L::Error>> {
        self.expect_step(PaymentStep::Idle, "start scanning")?;
        self.enter_scanning()
    }

    /// Feeds a scanned QR payload into the flow.
    ///
    /// On success the scan device is released, the payload becomes the
    /// current intent, and the allowance policy is evaluated (see
    /// [`Self::review`]). On a decode failure the flow keeps scanning.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Decode`] or [`FlowError::Amount`] for unusable
    /// payloads, and any error from [`Self::review`].
    pub async fn submit_scan(&mut self, text: &str) -> Result<PaymentStep, FlowError<L::Error>> {
        self.expect_step(PaymentStep::Scanning, "accept a scan")?;
        if self.session.account().is_none() {
            return Err(self.fail(FlowError::NotConnected));
        }

        let intent = match intent::decode(text) {
            Ok(intent) => intent,
            Err(e) => return Err(self.fail(e.into())),
        };
        let amount = match TokenAmount::parse(intent.amount(), self.session.token().decimals) {
            Ok(amount) => amount,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.release_device();
        self.intent = Some(intent);
        self.amount = Some(amount);
        self.transition(PaymentStep::Reviewing {
            needs_approval: None,
        });
        self.review().await
    }

    /// Reads the buyer's allowance and routes to approval or payment.
    ///
    /// Called automatically by [`Self::submit_scan`]; call it again to retry
    /// after an allowance lookup failure.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Ledger`] if the allowance cannot be read.
    pub async fn review(&mut self) -> Result<PaymentStep, FlowError<L::Error>> {
        if !matches!(self.step, PaymentStep::Reviewing { .. }) {
            return Err(self.invalid("review the payment"));
        }
        let required = self.required_amount();
        let current = self.read_allowance().await?;
        let state = AllowanceState::new(current, required);
        self.allowance = Some(state);

        let needs_approval = state.needs_approval();
        self.transition(PaymentStep::Reviewing {
            needs_approval: Some(needs_approval),
        });
        if needs_approval {
            self.transition(PaymentStep::Approving);
        } else {
            self.transition(PaymentStep::Paying);
        }
        Ok(self.step)
    }

    /// Submits an approval for exactly the payment amount and waits for it.
    ///
    /// Once confirmed the allowance is read again: if it now covers the payment
    /// the flow moves to [`PaymentStep::Paying`], otherwise it returns to
    /// [`PaymentStep::Approving`] so the user can approve again.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Ledger`] if the approval is rejected, reverts, or
    /// the refreshed allowance cannot be read.
    pub async fn approve(&mut self) -> Result<PaymentStep, FlowError<L::Error>> {
        self.expect_step(PaymentStep::Approving, "approve")?;
        let required = self.required_amount();

        #[cfg(feature = "telemetry")]
        tracing::info!(amount = %required, "Submitting approval");

        self.approval = None;
        let confirmation = match self.ledger.approve(required).await {
            Ok(confirmation) => confirmation,
            Err(e) => return Err(self.fail(FlowError::Ledger(e))),
        };

        #[cfg(feature = "telemetry")]
        tracing::info!(tx = %confirmation.transaction, "Approval confirmed");
        self.approval = Some(confirmation);

        self.transition(PaymentStep::AwaitingAllowanceRefresh);
        self.refresh_allowance().await
    }

    /// Re-reads the allowance after a confirmed approval.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Ledger`] if the allowance cannot be read; the flow
    /// stays in [`PaymentStep::AwaitingAllowanceRefresh`].
    pub async fn refresh_allowance(&mut self) -> Result<PaymentStep, FlowError<L::Error>> {
        self.expect_step(PaymentStep::AwaitingAllowanceRefresh, "refresh the allowance")?;
        let required = self.required_amount();
        let current = self.read_allowance().await?;
        let state = AllowanceState::new(current, required);
        self.allowance = Some(state);

        if state.needs_approval() {
            #[cfg(feature = "telemetry")]
            tracing::warn!(
                allowance = %current,
                required = %required,
                "Allowance still insufficient after approval"
            );
            self.transition(PaymentStep::Approving);
        } else {
            self.transition(PaymentStep::Paying);
        }
        Ok(self.step)
    }

    /// Submits the payment and waits for its confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Ledger`] if the payment is rejected or reverts;
    /// the flow stays in [`PaymentStep::Paying`].
    pub async fn pay(&mut self) -> Result<PaymentStep, FlowError<L::Error>> {
        self.expect_step(PaymentStep::Paying, "pay")?;
        let required = self.required_amount();
        let (seller, reference) = self
            .intent
            .as_ref()
            .map(|i| (i.seller().to_owned(), i.reference().to_owned()))
            .unwrap_or_default();

        #[cfg(feature = "telemetry")]
        tracing::info!(seller = %seller, amount = %required, "Submitting payment");

        match self.ledger.pay_merchant(&seller, required, &reference).await {
            Ok(confirmation) => {
                #[cfg(feature = "telemetry")]
                tracing::info!(tx = %confirmation.transaction, "Payment confirmed");
                self.confirmation = Some(confirmation);
                self.transition(PaymentStep::Succeeded);
                Ok(self.step)
            }
            Err(e) => Err(self.fail(FlowError::Ledger(e))),
        }
    }

    /// Clears the completed payment and starts scanning again.
    ///
    /// # Errors
    ///
    /// Fails if the payment has not succeeded or the scan device cannot be started.
    pub fn make_another_payment(&mut self) -> Result<(), FlowError<L::Error>> {
        self.expect_step(PaymentStep::Succeeded, "start another payment")?;
        self.intent = None;
        self.amount = None;
        self.allowance = None;
        self.approval = None;
        self.confirmation = None;
        self.enter_scanning()
    }

    fn enter_scanning(&mut self) -> Result<(), FlowError<L::Error>> {
        self.release_device();
        if let Err(e) = self.device.start() {
            return Err(self.fail(e.into()));
        }
        self.device_active = true;
        self.transition(PaymentStep::Scanning);
        Ok(())
    }

    fn release_device(&mut self) {
        if self.device_active {
            self.device.stop();
            self.device_active = false;
        }
    }

    async fn read_allowance(&mut self) -> Result<alloy_primitives::U256, FlowError<L::Error>> {
        let Some(owner) = self.session.account().map(str::to_owned) else {
            return Err(self.fail(FlowError::NotConnected));
        };
        match self.ledger.allowance(&owner).await {
            Ok(allowance) => Ok(allowance),
            Err(e) => Err(self.fail(FlowError::Ledger(e))),
        }
    }

    fn required_amount(&self) -> alloy_primitives::U256 {
        self.amount
            .as_ref()
            .map(TokenAmount::base_units)
            .unwrap_or_default()
    }

    fn expect_step(
        &mut self,
        expected: PaymentStep,
        action: &'static str,
    ) -> Result<(), FlowError<L::Error>> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&mut self, action: &'static str) -> FlowError<L::Error> {
        self.fail(FlowError::InvalidTransition {
            step: self.step,
            action,
        })
    }

    fn fail(&mut self, error: FlowError<L::Error>) -> FlowError<L::Error> {
        #[cfg(feature = "telemetry")]
        tracing::warn!(step = %self.step, error = %error, "Payment step failed");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_failure(self.step, &error.to_string());
        }
        error
    }

    fn transition(&mut self, to: PaymentStep) {
        let from = self.step;
        self.step = to;
        #[cfg(feature = "telemetry")]
        tracing::debug!(from = %from, to = %to, "Payment step changed");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_transition(from, to);
        }
    }
}

impl<L: PaymentLedger, D: ScanDevice> Drop for PaymentFlow<L, D> {
    fn drop(&mut self) {
        self.release_device();
    }
}
