//! # flow-client
//!
//! HTTP implementation of the `IntentClient` trait for checkout-flow.
//!
//! This crate provides:
//!
//! 1. **HttpIntentClient** - reqwest client for the backend's payment API
//!    - `POST /api/payment/create`
//!    - `GET /api/payment/status/{payment_id}`
//!    - `GET /api/payment/methods`
//!
//! 2. **GatewayConfig** - env-driven connection configuration
//!
//! 3. **IdentityProvider** - explicit injection of the paying user,
//!    replacing ambient credential reads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flow_client::{GatewayConfig, HttpIntentClient, StaticIdentity};
//! use std::sync::Arc;
//!
//! let identity = Arc::new(StaticIdentity::from_env()?);
//! let client = HttpIntentClient::from_env(identity)?;
//!
//! let intent = client.create_intent(&request).await?;
//! // Hand the intent to a PaymentSession, or render intent.payment_url
//! ```

pub mod config;
pub mod http;
pub mod identity;

// Re-exports
pub use config::GatewayConfig;
pub use http::HttpIntentClient;
pub use identity::{IdentityProvider, SharedIdentityProvider, StaticIdentity, UserIdentity};
