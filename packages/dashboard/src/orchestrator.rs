use std::collections::VecDeque;

use cosmwasm_std::Decimal;

use crate::client::{build_requests, SigningClient, TxRequest};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::wallet::Session;

/// A user-confirmed change to the position. Amounts are whole units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    LockCollateral(Decimal),
    UnlockCollateral(Decimal),
    MintDira(Decimal),
    ReturnDira(Decimal),
}

impl Action {
    pub fn amount(&self) -> Decimal {
        match self {
            Action::LockCollateral(amount)
            | Action::UnlockCollateral(amount)
            | Action::MintDira(amount)
            | Action::ReturnDira(amount) => *amount,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::LockCollateral(_) => "lock_collateral",
            Action::UnlockCollateral(_) => "unlock_collateral",
            Action::MintDira(_) => "mint_dira",
            Action::ReturnDira(_) => "return_dira",
        }
    }

    fn success_message(&self) -> String {
        match self {
            Action::ReturnDira(_) => "Successfully returned Dira!".to_string(),
            _ => "Transaction successful!".to_string(),
        }
    }

    fn failure_message(&self, reason: &str) -> String {
        match self {
            Action::ReturnDira(_) => format!("Failed to return Dira: {reason}"),
            _ => format!("Transaction failed: {reason}"),
        }
    }
}

/// Transient user feedback, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
    Info(String),
    /// Ask the user to connect a wallet; the action that needed it is kept
    ConnectionPrompt,
}

/// Identifies one submission within one wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub id: u64,
}

/// Requests the host must execute, in order, signed by `sender`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: Ticket,
    pub action: Action,
    pub sender: String,
    pub requests: Vec<TxRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TxOutcome {
    Success,
    /// `step` is the index of the request that failed; earlier steps went through
    Failed { step: usize, reason: String },
}

/// Execute a submission's requests in order, stopping at the first failure.
pub fn run_submission<S: SigningClient + ?Sized>(
    signer: &mut S,
    submission: &Submission,
) -> TxOutcome {
    for (step, request) in submission.requests.iter().enumerate() {
        if let Err(err) = signer.execute(&submission.sender, request) {
            return TxOutcome::Failed {
                step,
                reason: err.to_string(),
            };
        }
    }
    TxOutcome::Success
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InFlight {
    ticket: Ticket,
    action: Action,
}

/// Idle -> Pending -> Idle state machine around contract executions.
///
/// Only one submission is in flight at a time. Without a connected account the
/// action is parked and replayed once after the next successful connection.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: DashboardConfig,
    session: Session,
    in_flight: Option<InFlight>,
    deferred: Option<Action>,
    next_id: u64,
    notices: VecDeque<Notice>,
    refresh_requested: bool,
}

impl Orchestrator {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            session: Session::default(),
            in_flight: None,
            deferred: None,
            next_id: 0,
            notices: VecDeque::new(),
            refresh_requested: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn deferred(&self) -> Option<Action> {
        self.deferred
    }

    /// Whether an apply control for `amount` should be enabled.
    pub fn can_apply(&self, amount: Decimal) -> bool {
        !amount.is_zero() && !self.is_pending() && self.session.is_connected()
    }

    /// Start `action`. Returns `None` when the action was deferred until a
    /// wallet connects.
    pub fn submit(
        &mut self,
        action: Action,
        collateral_denom: &str,
    ) -> DashboardResult<Option<Submission>> {
        if action.amount().is_zero() {
            return Err(dira_types::DiraError::ZeroAmount.into());
        }
        if self.is_pending() {
            return Err(DashboardError::TransactionPending);
        }

        let Some(sender) = self.session.address().map(str::to_string) else {
            log::info!("deferring {} until a wallet connects", action.label());
            self.deferred = Some(action);
            self.notices.push_back(Notice::ConnectionPrompt);
            return Ok(None);
        };

        let requests = build_requests(&action, &self.config, collateral_denom)?;
        let ticket = Ticket {
            epoch: self.session.epoch(),
            id: self.next_id,
        };
        self.next_id += 1;
        self.in_flight = Some(InFlight { ticket, action });

        log::info!(
            "submitting {} of {} for {} ({} request(s))",
            action.label(),
            action.amount(),
            sender,
            requests.len()
        );

        Ok(Some(Submission {
            ticket,
            action,
            sender,
            requests,
        }))
    }

    /// Record a completed submission. Completions for another session or for
    /// a submission that is no longer in flight are ignored.
    /// Returns whether the outcome was applied.
    pub fn complete(&mut self, ticket: Ticket, outcome: TxOutcome) -> bool {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket && ticket.epoch == self.session.epoch() => {
                in_flight
            }
            _ => {
                log::debug!(
                    "ignoring completion for ticket {} of session {}",
                    ticket.id,
                    ticket.epoch
                );
                return false;
            }
        };
        self.in_flight = None;

        match outcome {
            TxOutcome::Success => {
                log::info!("{} succeeded", in_flight.action.label());
                self.notices
                    .push_back(Notice::Success(in_flight.action.success_message()));
                self.refresh_requested = true;
            }
            TxOutcome::Failed { step, reason } => {
                log::warn!(
                    "{} failed at step {}: {}",
                    in_flight.action.label(),
                    step,
                    reason
                );
                self.notices
                    .push_back(Notice::Error(in_flight.action.failure_message(&reason)));
            }
        }
        true
    }

    /// A wallet connected. Replays the deferred action, if any, exactly once.
    ///
    /// Connecting the account that is already connected keeps the session,
    /// so an in-flight submission still completes. Switching accounts starts
    /// a new session and forgets the previous account's submission.
    pub fn connection_succeeded(
        &mut self,
        address: String,
        collateral_denom: &str,
    ) -> Option<Submission> {
        self.notices
            .push_back(Notice::Success("Wallet connected!".to_string()));
        if self.session.address() == Some(address.as_str()) {
            log::debug!("wallet already connected: {address}");
            return None;
        }

        log::info!("wallet connected: {address}");
        if self.session.is_connected() {
            if let Some(in_flight) = self.in_flight.take() {
                log::debug!("dropping {} from previous account", in_flight.action.label());
            }
            self.refresh_requested = false;
        }
        self.session.establish(address);

        let action = self.deferred.take()?;
        match self.submit(action, collateral_denom) {
            Ok(submission) => submission,
            Err(err) => {
                self.notify_error(&err);
                None
            }
        }
    }

    /// Connecting failed; the deferred action is dropped.
    pub fn connection_failed(&mut self, err: &DashboardError) {
        log::warn!("wallet connection failed: {err}");
        if let Some(action) = self.deferred.take() {
            log::debug!("discarding deferred {}", action.label());
        }
        self.notify_error(err);
    }

    /// Tear the session down. In-flight submissions keep running on chain but
    /// their completions will be ignored.
    pub fn disconnect(&mut self) {
        if !self.session.is_connected() {
            return;
        }
        self.session.teardown();
        self.in_flight = None;
        self.deferred = None;
        self.refresh_requested = false;
        self.notices
            .push_back(Notice::Info("Wallet disconnected.".to_string()));
    }

    pub fn notify_error(&mut self, err: &DashboardError) {
        self.notices.push_back(Notice::Error(err.to_string()));
    }

    /// Whether a successful transaction asked for an immediate refresh.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}
