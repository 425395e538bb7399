//! # Payment Status
//!
//! Gateway-reported status of a payment intent, as polled by the client.

use serde::{Deserialize, Serialize};

/// Status of a payment as reported by the gateway.
///
/// Gateways spell interim states differently (`created`, `authorized`);
/// the aliases fold those into the client's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Intent created, awaiting customer action
    #[serde(alias = "created")]
    Pending,
    /// Customer acted, gateway still settling
    #[serde(alias = "authorized")]
    Processing,
    /// Amount captured by the gateway
    Captured,
    /// Settled and marked paid
    Paid,
    /// Explicit gateway failure
    Failed,
}

impl PaymentStatus {
    /// A terminal status admits no further change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Captured | PaymentStatus::Paid | PaymentStatus::Failed
        )
    }

    /// Captured and paid both mean the money is ours
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Captured | PaymentStatus::Paid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Captured => "captured",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_predicates() {
        assert!(PaymentStatus::Captured.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Processing.is_terminal());

        assert!(PaymentStatus::Captured.is_success());
        assert!(PaymentStatus::Paid.is_success());
        assert!(!PaymentStatus::Failed.is_success());
    }

    #[test]
    fn test_gateway_aliases() {
        let status: PaymentStatus = serde_json::from_str("\"created\"").unwrap();
        assert_eq!(status, PaymentStatus::Pending);

        let status: PaymentStatus = serde_json::from_str("\"authorized\"").unwrap();
        assert_eq!(status, PaymentStatus::Processing);

        let status: PaymentStatus = serde_json::from_str("\"captured\"").unwrap();
        assert_eq!(status, PaymentStatus::Captured);
    }
}
