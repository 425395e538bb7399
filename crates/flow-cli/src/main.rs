//! # checkout-flow
//!
//! Terminal driver for a payment session. Stands in for the UI
//! collaborator: creates an intent, prints the QR/redirect affordance,
//! shows the countdown, and exits with the terminal outcome.
//!
//! ```bash
//! # Set environment variables
//! export CHECKOUT_API_BASE_URL=https://api.careerforge.io
//! export CHECKOUT_USER_ID=usr_42
//! export CHECKOUT_USER_EMAIL=dev@careerforge.io
//!
//! # Run a UPI checkout for the pro plan
//! checkout-flow
//! ```

use anyhow::bail;
use flow_client::{HttpIntentClient, StaticIdentity};
use flow_core::{
    Amount, BillingCycle, CheckoutRequest, Currency, IntentClient, PaymentMethod,
};
use flow_session::{PaymentSession, SessionConfig, SessionEvent, SessionState};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    let identity = Arc::new(StaticIdentity::from_env()?);
    let client = Arc::new(HttpIntentClient::from_env(identity)?);

    let method: PaymentMethod = std::env::var("CHECKOUT_METHOD")
        .unwrap_or_else(|_| "upi".to_string())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let amount_minor: i64 = std::env::var("CHECKOUT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(59900);

    let plan_id = std::env::var("CHECKOUT_PLAN_ID").unwrap_or_else(|_| "pro-monthly".to_string());

    let checkout = CheckoutRequest::new(
        Amount::new(amount_minor, Currency::INR),
        plan_id.clone(),
        BillingCycle::Monthly,
    )
    .with_description(format!("Subscription: {}", plan_id));

    // Show what the gateway offers before kicking off
    match client.list_methods().await {
        Ok(methods) => {
            let names: Vec<_> = methods
                .iter()
                .filter(|m| m.enabled)
                .map(|m| m.name.as_str())
                .collect();
            info!("available payment methods: {}", names.join(", "));
        }
        Err(err) => warn!(%err, "could not list payment methods"),
    }

    info!(
        "starting {} checkout for {} ({})",
        method,
        checkout.amount.display(),
        plan_id
    );

    let (session, mut events) =
        PaymentSession::new(client, checkout, SessionConfig::default());
    session.start(method);

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::State(SessionState::AwaitingPayment { intent }) => {
                info!("open the payment page: {}", intent.payment_url);
                if let Some(qr) = &intent.qr_code_url {
                    info!("or scan the QR code: {}", qr);
                }
            }
            SessionEvent::State(SessionState::Regenerating) => {
                info!("payment window expired, generating a fresh QR code");
            }
            SessionEvent::State(SessionState::Succeeded { status }) => {
                info!(%status, "payment completed, subscription is active");
                return Ok(());
            }
            SessionEvent::State(SessionState::Failed { reason, message }) => {
                bail!("payment failed ({}): {}", reason, message);
            }
            SessionEvent::Countdown { remaining_secs } => {
                // A line a second would drown the log; surface the last
                // stretch and the occasional milestone.
                if remaining_secs % 60 == 0 || remaining_secs <= 10 {
                    info!("time remaining: {}", format_remaining(remaining_secs));
                }
            }
            SessionEvent::State(_) => {}
        }
    }

    bail!("session closed without a terminal state")
}

/// Format remaining seconds as HH:MM:SS
fn format_remaining(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00:00");
        assert_eq!(format_remaining(61), "00:01:01");
        assert_eq!(format_remaining(900), "00:15:00");
        assert_eq!(format_remaining(3661), "01:01:01");
    }
}
