//! # Payment Session State Machine
//!
//! Composes the intent client, expiry timer, and polling controller into
//! the payment lifecycle:
//!
//! ```text
//! Idle → Creating → AwaitingPayment → (Regenerating → AwaitingPayment)*
//!                                   → Succeeded | Failed
//! ```
//!
//! All session state lives on a single driver task. The timer and poller
//! run as separate tasks but only talk to the driver through
//! generation-tagged events on one logical queue, so there is no shared
//! mutation and no locking. Events tagged with a superseded generation
//! are dropped on receipt, which is what prevents the race between
//! regeneration and an in-flight status poll.

use crate::config::SessionConfig;
use crate::poller::{PollEvent, PollSignal, PollingController};
use crate::timer::{ExpiryTimer, TimerEvent};
use flow_core::{
    CheckoutRequest, FailureReason, IntentRequest, PaymentIntent, PaymentMethod, PaymentResult,
    PaymentStatus, SharedIntentClient,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Observable state of a payment session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No intent yet
    Idle,
    /// Intent creation in flight
    Creating,
    /// Intent live; polling and counting down concurrently
    AwaitingPayment { intent: PaymentIntent },
    /// Previous intent expired; a replacement is in flight
    Regenerating,
    /// Terminal: the gateway captured the payment
    Succeeded { status: PaymentStatus },
    /// Terminal: the session cannot complete
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl SessionState {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Succeeded { .. } | SessionState::Failed { .. }
        )
    }

    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Creating => "creating",
            SessionState::AwaitingPayment { .. } => "awaiting_payment",
            SessionState::Regenerating => "regenerating",
            SessionState::Succeeded { .. } => "succeeded",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// Events delivered to the session's UI collaborator.
///
/// Exactly one terminal `State` event is delivered per attempt; late
/// signals arriving after a terminal state are discarded, not forwarded.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session transitioned
    State(SessionState),
    /// Seconds left in the current intent's validity window
    Countdown { remaining_secs: u64 },
}

/// UI-issued commands
#[derive(Debug)]
enum Command {
    Start(PaymentMethod),
    Cancel,
    Retry,
}

/// Result of one create attempt, tagged with its generation
#[derive(Debug)]
struct CreatedEvent {
    generation: u64,
    result: PaymentResult<PaymentIntent>,
}

/// Handle to a running payment session.
///
/// Owned by exactly one UI collaborator. Dropping the handle closes the
/// session: the driver tears down the timer and poller and ignores any
/// responses still in flight.
pub struct PaymentSession {
    commands: mpsc::UnboundedSender<Command>,
}

impl PaymentSession {
    /// Spawn a session driver for one purchase.
    ///
    /// Returns the command handle and the event stream that drives
    /// rendering of QR codes, countdowns, and success/failure views.
    pub fn new(
        client: SharedIntentClient,
        checkout: CheckoutRequest,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (created_tx, created_rx) = mpsc::unbounded_channel();
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            client,
            checkout,
            config,
            ui_tx,
            created_tx,
            poll_tx,
            timer_tx,
            state: SessionState::Idle,
            method: None,
            request: None,
            generation: 0,
            regenerations: 0,
            auto_retried: false,
            last_status: PaymentStatus::Pending,
            timer: None,
            poller: None,
        };

        tokio::spawn(driver.run(cmd_rx, created_rx, poll_rx, timer_rx));

        (Self { commands: cmd_tx }, ui_rx)
    }

    /// Begin the flow with the selected method. Ignored unless Idle.
    pub fn start(&self, method: PaymentMethod) {
        let _ = self.commands.send(Command::Start(method));
    }

    /// Close the payment flow. Terminal states ignore this.
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Begin a fresh attempt after a failure. Ignored unless Failed.
    pub fn retry(&self) {
        let _ = self.commands.send(Command::Retry);
    }
}

/// Owns all session state; runs on its own task
struct Driver {
    client: SharedIntentClient,
    checkout: CheckoutRequest,
    config: SessionConfig,

    ui_tx: mpsc::UnboundedSender<SessionEvent>,
    created_tx: mpsc::UnboundedSender<CreatedEvent>,
    poll_tx: mpsc::UnboundedSender<PollEvent>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,

    state: SessionState,
    method: Option<PaymentMethod>,
    /// The create attempt currently in flight; its idempotency key is
    /// reused on the automatic retry and replaced on regeneration.
    request: Option<IntentRequest>,
    /// Incremented for every create attempt; events tagged with an older
    /// generation are stale and dropped.
    generation: u64,
    regenerations: u32,
    auto_retried: bool,
    last_status: PaymentStatus,

    timer: Option<ExpiryTimer>,
    poller: Option<PollingController>,
}

impl Driver {
    /// Event loop. Gateway events drain before timer events, so a
    /// terminal poll result queued in the same tick as an expiry wins;
    /// an interim poll processed first leaves the expiry to win on the
    /// next turn.
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut created: mpsc::UnboundedReceiver<CreatedEvent>,
        mut polls: mpsc::UnboundedReceiver<PollEvent>,
        mut timer: mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        loop {
            tokio::select! {
                biased;
                Some(event) = created.recv() => self.on_created(event),
                Some(event) = polls.recv() => self.on_poll(event),
                Some(event) = timer.recv() => self.on_timer(event),
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => {
                        // UI dropped the handle: close the session
                        debug!("session handle dropped, shutting down");
                        self.stop_workers();
                        return;
                    }
                },
            }
        }
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Start(method) => {
                if !matches!(self.state, SessionState::Idle) {
                    warn!(state = self.state.name(), "start ignored, session already running");
                    return;
                }
                self.method = Some(method);
                self.request = Some(IntentRequest::new(&self.checkout, method));
                self.auto_retried = false;
                self.transition(SessionState::Creating);
                self.spawn_create();
            }
            Command::Cancel => {
                if self.state.is_terminal() {
                    debug!("cancel ignored, session already terminal");
                    return;
                }
                self.fail(FailureReason::UserCancelled, "payment cancelled by user");
            }
            Command::Retry => {
                if !matches!(self.state, SessionState::Failed { .. }) {
                    warn!(state = self.state.name(), "retry ignored, session not failed");
                    return;
                }
                let Some(method) = self.method else {
                    warn!("retry ignored, no method was ever selected");
                    return;
                };
                info!("retrying payment after failure");
                self.regenerations = 0;
                self.last_status = PaymentStatus::Pending;
                self.request = Some(IntentRequest::new(&self.checkout, method));
                self.auto_retried = false;
                self.transition(SessionState::Creating);
                self.spawn_create();
            }
        }
    }

    fn on_created(&mut self, event: CreatedEvent) {
        if event.generation != self.generation {
            debug!(
                got = event.generation,
                current = self.generation,
                "dropping stale create result"
            );
            return;
        }
        if self.state.is_terminal() {
            debug!("dropping create result, session already terminal");
            return;
        }
        if !matches!(
            self.state,
            SessionState::Creating | SessionState::Regenerating
        ) {
            debug!(state = self.state.name(), "unexpected create result");
            return;
        }

        match event.result {
            Ok(intent) => self.enter_awaiting(intent),
            Err(err) => {
                if !self.auto_retried {
                    // One automatic retry with the same idempotency key;
                    // anything further needs an explicit retry().
                    self.auto_retried = true;
                    info!(%err, "intent creation failed, retrying once");
                    self.spawn_create();
                } else {
                    let reason = if matches!(self.state, SessionState::Regenerating) {
                        FailureReason::RegenerationError
                    } else {
                        FailureReason::CreationError
                    };
                    self.fail(reason, err.to_string());
                }
            }
        }
    }

    fn on_poll(&mut self, event: PollEvent) {
        if event.generation != self.generation {
            debug!(
                got = event.generation,
                current = self.generation,
                "dropping stale poll signal"
            );
            return;
        }
        if self.state.is_terminal() {
            debug!("dropping poll signal, session already terminal");
            return;
        }

        match event.signal {
            PollSignal::Status(status) => {
                self.last_status = status;
                if status.is_success() {
                    self.succeed(status);
                } else if status == PaymentStatus::Failed {
                    self.fail(FailureReason::GatewayFailed, "gateway reported a failed payment");
                } else {
                    debug!(%status, "interim status");
                }
            }
            PollSignal::Timeout => {
                self.fail(
                    FailureReason::PollingTimeout,
                    "no terminal status within the polling window",
                );
            }
            PollSignal::FailuresExhausted { last_error } => {
                self.fail(
                    FailureReason::PollingTimeout,
                    format!("status polling gave up: {}", last_error),
                );
            }
        }
    }

    fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick {
                generation,
                remaining_secs,
            } => {
                if generation == self.generation
                    && matches!(self.state, SessionState::AwaitingPayment { .. })
                {
                    let _ = self.ui_tx.send(SessionEvent::Countdown { remaining_secs });
                }
            }
            TimerEvent::Expired { generation } => {
                if generation != self.generation
                    || !matches!(self.state, SessionState::AwaitingPayment { .. })
                {
                    debug!(generation, "dropping stale expiry");
                    return;
                }
                // Expiry alone is not a failure: while the gateway still
                // says pending/processing, mint a replacement intent.
                if self.last_status.is_terminal() {
                    return;
                }
                self.regenerate();
            }
        }
    }

    fn spawn_create(&mut self) {
        let Some(request) = self.request.clone() else {
            return;
        };
        self.generation += 1;
        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.created_tx.clone();
        tokio::spawn(async move {
            let result = client.create_intent(&request).await;
            let _ = tx.send(CreatedEvent { generation, result });
        });
    }

    fn enter_awaiting(&mut self, intent: PaymentIntent) {
        self.stop_workers();
        self.auto_retried = false;
        self.last_status = PaymentStatus::Pending;

        self.timer = Some(ExpiryTimer::start(
            intent.expires_at,
            self.generation,
            self.timer_tx.clone(),
        ));
        self.poller = Some(PollingController::start(
            self.client.clone(),
            intent.id.clone(),
            self.generation,
            &self.config,
            self.poll_tx.clone(),
        ));

        info!(
            intent_id = %intent.id,
            generation = self.generation,
            expires_at = %intent.expires_at,
            "awaiting payment"
        );
        self.transition(SessionState::AwaitingPayment { intent });
    }

    fn regenerate(&mut self) {
        if self.regenerations >= self.config.max_regenerations {
            self.fail(
                FailureReason::RegenerationError,
                format!(
                    "intent expired {} times without a terminal status",
                    self.regenerations + 1
                ),
            );
            return;
        }
        self.regenerations += 1;
        self.stop_workers();

        let Some(method) = self.method else {
            return;
        };
        info!(
            regeneration = self.regenerations,
            "intent expired, requesting a replacement"
        );
        // Fresh attempt, fresh idempotency key
        self.request = Some(IntentRequest::new(&self.checkout, method));
        self.auto_retried = false;
        self.transition(SessionState::Regenerating);
        self.spawn_create();
    }

    fn succeed(&mut self, status: PaymentStatus) {
        if self.state.is_terminal() {
            return;
        }
        self.stop_workers();
        info!(%status, "payment succeeded");
        self.transition(SessionState::Succeeded { status });
    }

    fn fail(&mut self, reason: FailureReason, message: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        self.stop_workers();
        let message = message.into();
        warn!(%reason, %message, "payment session failed");
        self.transition(SessionState::Failed { reason, message });
    }

    /// Tear down timer and poller the instant the outcome is known
    fn stop_workers(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next.clone();
        let _ = self.ui_tx.send(SessionEvent::State(next));
    }
}
