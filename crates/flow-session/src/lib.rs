//! # flow-session
//!
//! Payment session orchestration for checkout-flow.
//!
//! This crate composes the `IntentClient` with two clock-driven workers
//! into the payment lifecycle state machine:
//!
//! - `ExpiryTimer` - per-intent countdown tied to the validity window
//! - `PollingController` - bounded-lifetime status-check scheduler
//! - `PaymentSession` - the state machine the UI talks to
//!
//! ## Example
//!
//! ```rust,ignore
//! use flow_session::{PaymentSession, SessionConfig, SessionEvent, SessionState};
//!
//! let (session, mut events) = PaymentSession::new(client, checkout, SessionConfig::default());
//! session.start(PaymentMethod::Upi);
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         SessionEvent::State(SessionState::AwaitingPayment { intent }) => {
//!             // Render intent.qr_code_url / intent.payment_url
//!         }
//!         SessionEvent::Countdown { remaining_secs } => {
//!             // Update the countdown display
//!         }
//!         SessionEvent::State(state) if state.is_terminal() => break,
//!         _ => {}
//!     }
//! }
//! ```
//!
//! Timer and poller events are tagged with a generation counter that the
//! session bumps for every create attempt; signals from a superseded
//! intent are dropped on receipt, so an in-flight poll can never clobber
//! a regeneration.

pub mod config;
pub mod machine;
pub mod poller;
pub mod timer;

#[cfg(test)]
pub(crate) mod testkit;

// Re-exports
pub use config::SessionConfig;
pub use machine::{PaymentSession, SessionEvent, SessionState};
pub use poller::{PollEvent, PollSignal, PollingController};
pub use timer::{ExpiryTimer, TimerEvent};
