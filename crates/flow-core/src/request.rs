//! # Checkout Requests
//!
//! What the UI knows about the purchase before and after a payment method
//! is chosen. An `IntentRequest` is cut per create attempt and carries its
//! own idempotency key; regeneration builds a fresh one.

use crate::error::{PaymentError, PaymentResult};
use crate::method::PaymentMethod;
use crate::money::{Amount, Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A purchase the UI wants to collect payment for.
///
/// Method-agnostic; the session combines this with the selected
/// `PaymentMethod` when it cuts an `IntentRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Amount in minor currency units
    pub amount: Amount,

    /// Human-readable description (plan name)
    #[serde(default)]
    pub description: String,

    /// Subscription plan identifier
    pub plan_id: String,

    /// Billing cycle for the plan
    pub billing_cycle: BillingCycle,
}

impl CheckoutRequest {
    pub fn new(amount: Amount, plan_id: impl Into<String>, billing_cycle: BillingCycle) -> Self {
        Self {
            amount,
            description: String::new(),
            plan_id: plan_id.into(),
            billing_cycle,
        }
    }

    /// Builder: set the description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// One create attempt against the gateway.
///
/// Each attempt gets its own idempotency key; retrying the same attempt
/// reuses the key, regenerating an expired intent does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRequest {
    /// Amount in minor currency units
    pub amount: Amount,

    /// Description passed through to the gateway
    pub description: String,

    /// Subscription plan identifier
    pub plan_id: String,

    /// Billing cycle
    pub billing_cycle: BillingCycle,

    /// Selected payment method
    pub method: PaymentMethod,

    /// Idempotency key for this attempt
    pub idempotency_key: String,
}

impl IntentRequest {
    /// Cut a new attempt from a checkout request and a chosen method
    pub fn new(checkout: &CheckoutRequest, method: PaymentMethod) -> Self {
        Self {
            amount: checkout.amount,
            description: checkout.description.clone(),
            plan_id: checkout.plan_id.clone(),
            billing_cycle: checkout.billing_cycle,
            method,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    /// Validate before the wire: amount must be positive and the method
    /// must accept the currency.
    pub fn validate(&self) -> PaymentResult<()> {
        if !self.amount.is_positive() {
            return Err(PaymentError::InvalidRequest(format!(
                "amount must be positive, got {}",
                self.amount.minor
            )));
        }

        if self.method.requires_inr() && self.amount.currency != Currency::INR {
            return Err(PaymentError::InvalidRequest(format!(
                "{} payments require INR, got {}",
                self.method, self.amount.currency
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout() -> CheckoutRequest {
        CheckoutRequest::new(
            Amount::new(59900, Currency::INR),
            "pro-monthly",
            BillingCycle::Monthly,
        )
        .with_description("Pro plan")
    }

    #[test]
    fn test_intent_request_validates() {
        let request = IntentRequest::new(&checkout(), PaymentMethod::Upi);
        assert!(request.validate().is_ok());
        assert!(!request.idempotency_key.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut request = IntentRequest::new(&checkout(), PaymentMethod::Card);
        request.amount = Amount::new(0, Currency::INR);
        assert!(matches!(
            request.validate(),
            Err(PaymentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_rejects_domestic_method_without_inr() {
        let mut request = IntentRequest::new(&checkout(), PaymentMethod::Upi);
        request.amount = Amount::new(2900, Currency::USD);
        assert!(matches!(
            request.validate(),
            Err(PaymentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_attempts_get_distinct_keys() {
        let a = IntentRequest::new(&checkout(), PaymentMethod::Upi);
        let b = IntentRequest::new(&checkout(), PaymentMethod::Upi);
        assert_ne!(a.idempotency_key, b.idempotency_key);
    }
}
