//! # Expiry Timer
//!
//! Per-intent countdown clock tied to the intent's validity window.
//! Ticks once a second, fires `Expired` exactly once when the window
//! closes, and never fires after `cancel()`.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Events emitted by the timer, tagged with the generation of the intent
/// they belong to so the session can discard stale firings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed; `remaining_secs` until the window closes
    Tick { generation: u64, remaining_secs: u64 },
    /// The validity window closed
    Expired { generation: u64 },
}

/// Countdown clock for one payment intent.
///
/// The remaining time is captured from `expires_at` once at start and
/// counted down on the tokio clock, so tests can drive it with a paused
/// runtime.
pub struct ExpiryTimer {
    handle: JoinHandle<()>,
}

impl ExpiryTimer {
    /// Start ticking toward `expires_at`.
    ///
    /// An `expires_at` already in the past expires on the first tick.
    pub fn start(
        expires_at: DateTime<Utc>,
        generation: u64,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut remaining = (expires_at - Utc::now()).num_seconds().max(0) as u64;
            debug!(generation, remaining, "expiry timer started");

            let mut ticks = tokio::time::interval(Duration::from_secs(1));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticks.tick().await; // first tick completes immediately

            let _ = events.send(TimerEvent::Tick {
                generation,
                remaining_secs: remaining,
            });

            while remaining > 0 {
                ticks.tick().await;
                remaining -= 1;
                let _ = events.send(TimerEvent::Tick {
                    generation,
                    remaining_secs: remaining,
                });
            }

            debug!(generation, "expiry timer fired");
            let _ = events.send(TimerEvent::Expired { generation });
        });

        Self { handle }
    }

    /// Stop the timer. Idempotent; no events are emitted afterwards.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_and_expires_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = ExpiryTimer::start(Utc::now() + ChronoDuration::seconds(3), 1, tx);

        let mut ticks = Vec::new();
        let mut expirations = 0;
        while let Some(event) = rx.recv().await {
            match event {
                TimerEvent::Tick { remaining_secs, .. } => ticks.push(remaining_secs),
                TimerEvent::Expired { generation } => {
                    assert_eq!(generation, 1);
                    expirations += 1;
                    break;
                }
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(*ticks.last().unwrap(), 0);
        // Strictly decreasing countdown
        assert!(ticks.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_expires_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = ExpiryTimer::start(Utc::now() - ChronoDuration::seconds(30), 7, tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            TimerEvent::Tick {
                generation: 7,
                remaining_secs: 0
            }
        );
        let second = rx.recv().await.unwrap();
        assert_eq!(second, TimerEvent::Expired { generation: 7 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_silences_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = ExpiryTimer::start(Utc::now() + ChronoDuration::seconds(120), 1, tx);

        // Let a couple of ticks through, then cancel
        let _ = rx.recv().await.unwrap();
        let _ = rx.recv().await.unwrap();
        timer.cancel();
        timer.cancel(); // idempotent

        // The sender is dropped by the aborted task; draining terminates
        // without ever observing Expired.
        while let Some(event) = rx.recv().await {
            assert!(matches!(event, TimerEvent::Tick { .. }));
        }
    }
}
