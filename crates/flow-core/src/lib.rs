//! # flow-core
//!
//! Core types and traits for the checkout-flow payment client.
//!
//! This crate provides:
//! - `IntentClient` trait for talking to the payment backend
//! - `PaymentIntent` and `PaymentStatus` for the transaction lifecycle
//! - `CheckoutRequest` / `IntentRequest` for cutting create attempts
//! - `PaymentMethod` and `MethodCatalog` for method capabilities
//! - `PaymentError` / `FailureReason` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use flow_core::{Amount, BillingCycle, CheckoutRequest, Currency, PaymentMethod};
//!
//! // Describe the purchase
//! let checkout = CheckoutRequest::new(
//!     Amount::new(59900, Currency::INR),
//!     "pro-monthly",
//!     BillingCycle::Monthly,
//! )
//! .with_description("Pro plan");
//!
//! // Cut one create attempt for the chosen method
//! let request = flow_core::IntentRequest::new(&checkout, PaymentMethod::Upi);
//! request.validate()?;
//!
//! let intent = client.create_intent(&request).await?;
//! // Render intent.qr_code_url / intent.payment_url, then poll
//! ```

pub mod client;
pub mod error;
pub mod intent;
pub mod method;
pub mod money;
pub mod request;
pub mod status;

// Re-exports for convenience
pub use client::{IntentClient, SharedIntentClient};
pub use error::{FailureReason, PaymentError, PaymentResult};
pub use intent::PaymentIntent;
pub use method::{MethodCatalog, MethodInfo, PaymentMethod};
pub use money::{Amount, Currency};
pub use request::{BillingCycle, CheckoutRequest, IntentRequest};
pub use status::PaymentStatus;
