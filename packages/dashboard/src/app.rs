use std::time::{Duration, Instant};

use dira_types::{DiraError, MarketSnapshot};

use crate::client::{fetch_market, fetch_snapshot, ChainQuerier, SigningClient};
use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::orchestrator::{run_submission, Action, Notice, Orchestrator, Submission, Ticket, TxOutcome};
use crate::poll::RefreshSchedule;
use crate::state::DashboardState;
use crate::wallet::{self, WalletProvider};

/// The dashboard core: view state, transaction orchestration and refresh
/// timing for one browser session.
///
/// The host owns all IO. It connects through a [`WalletProvider`], feeds
/// snapshots in (or lets [`DiraApp::refresh`] fetch them through a
/// [`ChainQuerier`]) and executes the [`Submission`]s handed out here.
#[derive(Debug, Clone)]
pub struct DiraApp {
    config: DashboardConfig,
    state: DashboardState,
    orchestrator: Orchestrator,
    schedule: RefreshSchedule,
}

impl DiraApp {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        Ok(Self {
            state: DashboardState::new(config.decimal_precision),
            orchestrator: Orchestrator::new(config.clone()),
            schedule: RefreshSchedule::new(Duration::from_secs(config.poll_interval_secs)),
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn address(&self) -> Option<&str> {
        self.orchestrator.session().address()
    }

    /// Current session epoch; pass it back with snapshots fetched by the host.
    pub fn epoch(&self) -> u64 {
        self.orchestrator.session().epoch()
    }

    pub fn is_pending(&self) -> bool {
        self.orchestrator.is_pending()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.orchestrator.drain_notices()
    }

    fn collateral_denom(&self) -> String {
        self.state.snapshot().collateral_denom.clone()
    }

    /// Connect through `provider` and start polling. Returns the deferred
    /// action's submission when one was waiting for the connection.
    pub fn connect<W: WalletProvider + ?Sized>(
        &mut self,
        provider: Option<&mut W>,
        now: Instant,
    ) -> Option<Submission> {
        match wallet::connect(provider, &self.config.chain) {
            Ok(address) => {
                if self.address().is_some_and(|current| current != address) {
                    log::info!("wallet account changed");
                    if let Err(err) = self.state.clear_account() {
                        log::warn!("failed to clear account state: {err}");
                    }
                }
                self.schedule.start(now);
                let denom = self.collateral_denom();
                self.orchestrator.connection_succeeded(address, &denom)
            }
            Err(err) => {
                self.orchestrator.connection_failed(&err);
                None
            }
        }
    }

    pub fn disconnect(&mut self) {
        if self.address().is_none() {
            return;
        }
        log::info!("disconnecting wallet");
        self.orchestrator.disconnect();
        self.schedule.stop();
        if let Err(err) = self.state.clear_account() {
            log::warn!("failed to clear account state: {err}");
        }
    }

    /// The wallet's active key changed; the user must connect again.
    pub fn on_keystore_change(&mut self) {
        if self.address().is_some() {
            log::info!("wallet keystore changed");
            self.disconnect();
        }
    }

    pub fn refresh_due(&self, now: Instant) -> bool {
        self.schedule.is_due(now)
    }

    /// Fetch and apply fresh chain state. Without a connected account only
    /// the market parameters are read. A failed refresh keeps the previous
    /// snapshot.
    pub fn refresh<Q: ChainQuerier>(&mut self, querier: &Q, now: Instant) -> DashboardResult<()> {
        self.schedule.mark_refreshed(now);

        let result = match self.address().map(str::to_string) {
            Some(address) => fetch_snapshot(querier, &self.config, &address)
                .and_then(|snapshot| self.state.apply_snapshot(snapshot)),
            None => fetch_market(querier, &self.config)
                .and_then(|(params, denom)| self.state.apply_market(params, denom)),
        };

        if let Err(err) = &result {
            log::warn!("refresh failed: {err}");
        }
        result
    }

    /// Apply a snapshot the host fetched under session `epoch`.
    /// Returns false when the session changed in the meantime.
    pub fn apply_snapshot(&mut self, epoch: u64, snapshot: MarketSnapshot) -> DashboardResult<bool> {
        if epoch != self.epoch() {
            log::debug!("dropping snapshot from session {epoch}");
            return Ok(false);
        }
        self.state.apply_snapshot(snapshot)?;
        Ok(true)
    }

    /// Submit the collateral control's pending change.
    pub fn apply_collateral(&mut self) -> DashboardResult<Option<Submission>> {
        let action = self.state.collateral_action();
        self.submit_pending(action)
    }

    /// Submit the debt control's pending change.
    pub fn apply_debt(&mut self) -> DashboardResult<Option<Submission>> {
        let action = self.state.debt_action();
        self.submit_pending(action)
    }

    /// Submit `action` directly. Without a connected wallet it is deferred
    /// and a connection prompt is queued.
    pub fn submit(&mut self, action: Action) -> DashboardResult<Option<Submission>> {
        self.submit_pending(Some(action))
    }

    fn submit_pending(&mut self, action: Option<Action>) -> DashboardResult<Option<Submission>> {
        let denom = self.collateral_denom();
        let result = match action {
            Some(action) => self.orchestrator.submit(action, &denom),
            None => Err(DiraError::ZeroAmount.into()),
        };
        if let Err(err) = &result {
            self.orchestrator.notify_error(err);
        }
        result
    }

    /// Report the outcome of a submission the host executed.
    pub fn complete(&mut self, ticket: Ticket, outcome: TxOutcome, now: Instant) -> bool {
        let applied = self.orchestrator.complete(ticket, outcome);
        if self.orchestrator.take_refresh_request() {
            self.schedule.force(now);
        }
        applied
    }

    /// Run `submission` to completion against `signer` and record the outcome.
    pub fn execute<S: SigningClient + ?Sized>(
        &mut self,
        signer: &mut S,
        submission: &Submission,
        now: Instant,
    ) -> TxOutcome {
        let outcome = run_submission(signer, submission);
        self.complete(submission.ticket, outcome.clone(), now);
        outcome
    }
}
