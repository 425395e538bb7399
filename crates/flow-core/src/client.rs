//! # Intent Client Trait
//!
//! Client-side seam to the payment backend. The session state machine only
//! sees this trait; the HTTP implementation lives in `flow-client` and
//! tests drive the machine with scripted fakes.

use crate::error::PaymentResult;
use crate::intent::PaymentIntent;
use crate::method::MethodInfo;
use crate::request::IntentRequest;
use crate::status::PaymentStatus;
use async_trait::async_trait;
use std::sync::Arc;

/// Thin client wrapping the gateway's create/status remote calls.
///
/// Implementations must not retry on their own; retry policy belongs to
/// the session state machine.
#[async_trait]
pub trait IntentClient: Send + Sync {
    /// Create a payment intent for one attempt.
    ///
    /// Returns an intent with a future `expires_at`; UPI-capable methods
    /// populate `qr_code_url`, others only `payment_url`.
    async fn create_intent(&self, request: &IntentRequest) -> PaymentResult<PaymentIntent>;

    /// Fetch the current status of an intent.
    async fn check_status(&self, intent_id: &str) -> PaymentResult<PaymentStatus>;

    /// List the methods the gateway currently offers.
    ///
    /// Consumed once at session start; not part of the state machine.
    async fn list_methods(&self) -> PaymentResult<Vec<MethodInfo>>;
}

/// Type alias for a shared client (dynamic dispatch)
pub type SharedIntentClient = Arc<dyn IntentClient>;
