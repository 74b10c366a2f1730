//! Refresh controller.
//!
//! A single task owns the refresh state and applies every change to it in
//! order. Fetches run on their own tasks and post their results back to
//! that task; nothing else touches the state.
//!
//! Every refresh gets a request id from a strictly increasing counter. A
//! result is applied only if its id is still the latest one issued, so a
//! slow response can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use xai_balance_client::{BillingApi, FetchError};
use xai_balance_core::{compute, BalanceError, BillingSnapshot, Credentials};

use crate::display::DisplayState;

/// Refresh period used by the menu (30 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1800);

/// Errors returned by [`RefreshHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The controller task has stopped.
    #[error("refresh controller has shut down")]
    Closed,
}

enum Command {
    SetCredentials(Credentials),
    Refresh,
    FetchCompleted {
        request_id: u64,
        result: Result<BillingSnapshot, FetchError>,
    },
    Shutdown,
}

/// State owned by the controller task.
///
/// The last snapshot and figures live in the published [`DisplayState`].
#[derive(Default)]
struct RefreshState {
    credentials: Option<Credentials>,
    latest_request: u64,
    timer: Option<JoinHandle<()>>,
}

/// Drives periodic billing refreshes.
pub struct RefreshController {
    api: Arc<dyn BillingApi>,
    interval: Duration,
    state: RefreshState,
    display: Arc<watch::Sender<DisplayState>>,
    commands: mpsc::WeakUnboundedSender<Command>,
}

impl RefreshController {
    /// Spawn the controller on the current Tokio runtime.
    ///
    /// Returns the handle used to drive it and the task, which finishes
    /// after [`RefreshHandle::shutdown`] or once every handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(api: Arc<dyn BillingApi>, interval: Duration) -> (RefreshHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (display, _) = watch::channel(DisplayState::default());
        let display = Arc::new(display);

        let controller = Self {
            api,
            interval,
            state: RefreshState::default(),
            display: Arc::clone(&display),
            commands: tx.downgrade(),
        };
        let task = tokio::spawn(controller.run(rx));

        (RefreshHandle { commands: tx, display }, task)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!(interval_secs = self.interval.as_secs(), "Refresh controller started");

        while let Some(command) = commands.recv().await {
            match command {
                Command::SetCredentials(credentials) => self.set_credentials(credentials),
                Command::Refresh => self.refresh(),
                Command::FetchCompleted { request_id, result } => {
                    self.complete(request_id, result);
                }
                Command::Shutdown => break,
            }
        }

        self.cancel_timer();
        tracing::info!("Refresh controller stopped");
    }

    fn set_credentials(&mut self, credentials: Credentials) {
        match credentials.into_complete() {
            Ok(credentials) => {
                tracing::info!(team_id = %credentials.team_id, "Credentials updated");
                self.state.credentials = Some(credentials);
                self.refresh();
                self.restart_timer();
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring incomplete credentials");
                self.state.credentials = None;
                self.cancel_timer();
                self.publish(DisplayState::without_credentials);
            }
        }
    }

    fn refresh(&mut self) {
        let Some(credentials) = self.state.credentials.clone() else {
            tracing::debug!(reason = %BalanceError::NoCredentials, "Skipping refresh");
            self.publish(DisplayState::without_credentials);
            return;
        };
        let Some(sender) = self.commands.upgrade() else {
            return;
        };

        self.state.latest_request += 1;
        let request_id = self.state.latest_request;
        tracing::debug!(request_id, team_id = %credentials.team_id, "Refreshing billing data");
        self.publish(DisplayState::refreshing);

        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let result = api.fetch(&credentials).await;
            if sender
                .send(Command::FetchCompleted { request_id, result })
                .is_err()
            {
                tracing::debug!(request_id, "Controller gone, dropping billing result");
            }
        });
    }

    fn complete(&mut self, request_id: u64, result: Result<BillingSnapshot, FetchError>) {
        if request_id != self.state.latest_request {
            tracing::warn!(
                request_id,
                latest_request = self.state.latest_request,
                "Discarding stale billing result"
            );
            return;
        }
        if self.state.credentials.is_none() {
            tracing::debug!(request_id, "Credentials cleared while fetching, dropping result");
            return;
        }

        match result {
            Ok(snapshot) => {
                let figures = compute(&snapshot);
                if !figures.is_complete() {
                    tracing::warn!(
                        request_id,
                        unavailable = ?figures.unavailable,
                        "Billing figures incomplete"
                    );
                }
                tracing::info!(
                    request_id,
                    summary = %figures.status_bar_summary,
                    billing_cycle = %figures.billing_cycle,
                    "Billing figures updated"
                );
                let now = Utc::now();
                self.publish(move |state| state.succeeded(snapshot, figures, now));
            }
            Err(err) => {
                tracing::warn!(request_id, error = %err, "Billing refresh failed");
                self.publish(|state| state.failed(err.to_string()));
            }
        }
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();

        let commands = self.commands.clone();
        let period = self.interval;
        self.state.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(sender) = commands.upgrade() else {
                    break;
                };
                if sender.send(Command::Refresh).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(interval_secs = period.as_secs(), "Refresh timer started");
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.state.timer.take() {
            timer.abort();
            tracing::debug!("Refresh timer cancelled");
        }
    }

    /// Publish the next display state; subscribers are notified only if it changed.
    fn publish(&self, next: impl FnOnce(&DisplayState) -> DisplayState) {
        self.display.send_if_modified(|state| {
            let next = next(state);
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}

/// Cloneable handle to a running [`RefreshController`].
#[derive(Clone)]
pub struct RefreshHandle {
    commands: mpsc::UnboundedSender<Command>,
    display: Arc<watch::Sender<DisplayState>>,
}

impl RefreshHandle {
    /// Store new credentials, refresh immediately and restart the timer.
    ///
    /// Incomplete credentials (blank key or team) clear the stored ones.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Closed`] if the controller has stopped.
    pub fn set_credentials(&self, credentials: Credentials) -> Result<(), RefreshError> {
        self.send(Command::SetCredentials(credentials))
    }

    /// Refresh now.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Closed`] if the controller has stopped.
    pub fn refresh(&self) -> Result<(), RefreshError> {
        self.send(Command::Refresh)
    }

    /// Cancel the timer and stop the controller. Safe to call repeatedly.
    pub fn shutdown(&self) {
        if self.send(Command::Shutdown).is_err() {
            tracing::debug!("Refresh controller already stopped");
        }
    }

    /// Whether the controller task has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Current status bar title.
    #[must_use]
    pub fn current_summary(&self) -> String {
        self.display.borrow().summary.clone()
    }

    /// Current invoice menu line.
    #[must_use]
    pub fn current_invoice_detail(&self) -> String {
        self.display.borrow().invoice_detail.clone()
    }

    /// Current prepaid menu line.
    #[must_use]
    pub fn current_prepaid_detail(&self) -> String {
        self.display.borrow().prepaid_detail.clone()
    }

    /// Copy of the full display state.
    #[must_use]
    pub fn state(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    /// Receiver notified whenever the display state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    /// Call `callback` with the current state and again after every change.
    ///
    /// The returned task ends when the controller and all handles are gone;
    /// abort it to unsubscribe earlier.
    pub fn on_change<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(&DisplayState) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            let state = rx.borrow_and_update().clone();
            callback(&state);
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                callback(&state);
            }
        })
    }

    fn send(&self, command: Command) -> Result<(), RefreshError> {
        self.commands.send(command).map_err(|_| RefreshError::Closed)
    }
}
