//! # Polling Controller
//!
//! Bounded-lifetime status-check scheduler for one payment intent.
//! Polls on a fixed interval until it sees a terminal status, its
//! absolute lifetime ceiling passes, or too many polls fail in a row.
//! The poll loop is sequential, so at most one status check is ever in
//! flight.

use crate::config::SessionConfig;
use flow_core::{PaymentStatus, SharedIntentClient};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// What one poll cycle learned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollSignal {
    /// The gateway reported a status
    Status(PaymentStatus),
    /// Lifetime ceiling passed without a terminal status; this is not a
    /// gateway failure
    Timeout,
    /// Too many consecutive poll failures
    FailuresExhausted { last_error: String },
}

/// A generation-tagged poll outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    pub generation: u64,
    pub signal: PollSignal,
}

/// Repeated status-check scheduler with a bounded lifetime
pub struct PollingController {
    handle: JoinHandle<()>,
}

impl PollingController {
    /// Start polling `intent_id`. The first check happens one interval
    /// after start.
    pub fn start(
        client: SharedIntentClient,
        intent_id: String,
        generation: u64,
        config: &SessionConfig,
        events: mpsc::UnboundedSender<PollEvent>,
    ) -> Self {
        let interval = config.poll_interval;
        let ceiling = config.poll_ceiling;
        let threshold = config.poll_failure_threshold;

        let handle = tokio::spawn(async move {
            let deadline = tokio::time::Instant::now() + ceiling;
            let mut ticks =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut consecutive_failures = 0u32;

            debug!(generation, %intent_id, "polling started");

            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => {
                        warn!(generation, %intent_id, "polling ceiling reached");
                        let _ = events.send(PollEvent {
                            generation,
                            signal: PollSignal::Timeout,
                        });
                        return;
                    }
                    _ = ticks.tick() => {
                        match client.check_status(&intent_id).await {
                            Ok(status) => {
                                consecutive_failures = 0;
                                let terminal = status.is_terminal();
                                let _ = events.send(PollEvent {
                                    generation,
                                    signal: PollSignal::Status(status),
                                });
                                if terminal {
                                    debug!(generation, %status, "terminal status, polling stops");
                                    return;
                                }
                            }
                            Err(err) => {
                                consecutive_failures += 1;
                                warn!(
                                    generation,
                                    consecutive_failures,
                                    %err,
                                    "status poll failed"
                                );
                                if consecutive_failures >= threshold {
                                    let _ = events.send(PollEvent {
                                        generation,
                                        signal: PollSignal::FailuresExhausted {
                                            last_error: err.to_string(),
                                        },
                                    });
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Self { handle }
    }

    /// Stop polling. Idempotent; no signals are emitted afterwards.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
