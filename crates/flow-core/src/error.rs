//! # Payment Error Types
//!
//! Typed error handling for the checkout-flow client.
//! All gateway operations return `Result<T, PaymentError>`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing env vars, invalid base URL)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (non-positive amount, currency/method mismatch)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Gateway rejected the operation or returned `success: false`
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    /// Network/HTTP error communicating with the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if this error is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::Network(_) | PaymentError::Gateway { .. }
        )
    }
}

/// Result type alias for gateway operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Why a payment session reached its `Failed` terminal state.
///
/// Carried in the terminal event so the UI can offer the appropriate
/// recovery path (retry, switch method, contact support).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The payment intent could not be created
    CreationError,
    /// The gateway reported an explicit payment failure
    GatewayFailed,
    /// Renewal of an expired intent failed
    RegenerationError,
    /// No terminal status within the polling lifetime ceiling
    PollingTimeout,
    /// The user closed the payment flow
    UserCancelled,
}

impl FailureReason {
    /// Wire/display name for this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::CreationError => "creation_error",
            FailureReason::GatewayFailed => "gateway_failed",
            FailureReason::RegenerationError => "regeneration_error",
            FailureReason::PollingTimeout => "polling_timeout",
            FailureReason::UserCancelled => "user_cancelled",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
