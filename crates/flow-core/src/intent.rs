//! # Payment Intent
//!
//! A gateway-issued record representing one proposed transaction with a
//! bounded validity window. Intents are immutable; an expired intent is
//! superseded by a fresh one, never mutated.

use crate::method::PaymentMethod;
use crate::money::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payment intent returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Gateway's intent/order id
    pub id: String,

    /// Amount in minor currency units
    pub amount: Amount,

    /// Method this intent was created for
    pub method: PaymentMethod,

    /// Hosted page to redirect the customer to
    pub payment_url: String,

    /// Scannable QR image URL (UPI only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,

    /// End of the validity window
    pub expires_at: DateTime<Utc>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Whether the validity window has closed
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Seconds left in the validity window, clamped at zero
    pub fn remaining_secs(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(0) as u64
    }

    /// UPI intents carry a QR affordance
    pub fn has_qr(&self) -> bool {
        self.qr_code_url.is_some()
    }
}
