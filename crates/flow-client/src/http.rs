//! # HTTP Intent Client
//!
//! reqwest implementation of `IntentClient` against the payment backend's
//! REST endpoints. This layer maps wire shapes to core types and never
//! retries on its own; retry policy belongs to the session state machine.

use crate::config::GatewayConfig;
use crate::identity::SharedIdentityProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flow_core::{
    Currency, IntentClient, IntentRequest, MethodInfo, PaymentError, PaymentIntent,
    PaymentResult, PaymentStatus,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Intent client backed by the payment backend's REST API
pub struct HttpIntentClient {
    config: GatewayConfig,
    identity: SharedIdentityProvider,
    client: Client,
}

impl HttpIntentClient {
    /// Create a new client
    pub fn new(config: GatewayConfig, identity: SharedIdentityProvider) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            identity,
            client,
        }
    }

    /// Create from environment variables plus an injected identity
    pub fn from_env(identity: SharedIdentityProvider) -> PaymentResult<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(config, identity))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_body(response: reqwest::Response) -> PaymentResult<(reqwest::StatusCode, String)> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl IntentClient for HttpIntentClient {
    #[instrument(skip(self, request), fields(method = %request.method, plan = %request.plan_id))]
    async fn create_intent(&self, request: &IntentRequest) -> PaymentResult<PaymentIntent> {
        request.validate()?;

        let user = self.identity.identity();
        let body = CreatePaymentWire {
            amount: request.amount.minor,
            currency: request.amount.currency,
            user_id: user.user_id,
            user_email: user.email,
            user_name: user.name,
            description: request.description.clone(),
            plan_id: request.plan_id.clone(),
            billing_cycle: request.billing_cycle.as_str(),
            payment_method: request.method.as_str(),
        };

        debug!(amount = body.amount, "creating payment intent");

        let url = format!("{}/api/payment/create", self.config.base_url());
        let response = self
            .request(self.client.post(&url))
            .header("Idempotency-Key", &request.idempotency_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            error!("create intent failed: status={}, body={}", status, body);
            return Err(gateway_error(status, &body));
        }

        let wire: CreateResponseWire = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse create response: {}", e))
        })?;

        if !wire.success {
            return Err(PaymentError::Gateway {
                message: wire
                    .error
                    .unwrap_or_else(|| "payment creation failed".to_string()),
            });
        }

        let payment_id = wire.payment_id.ok_or_else(|| {
            PaymentError::Serialization("create response missing payment_id".to_string())
        })?;
        let payment_url = wire.payment_url.ok_or_else(|| {
            PaymentError::Serialization("create response missing payment_url".to_string())
        })?;
        let expires_at = wire.expires_at.ok_or_else(|| {
            PaymentError::Serialization("create response missing expires_at".to_string())
        })?;

        info!(
            "created payment intent: id={}, expires_at={}",
            payment_id, expires_at
        );

        Ok(PaymentIntent {
            id: payment_id,
            amount: request.amount,
            method: request.method,
            payment_url,
            qr_code_url: wire.qr_code_url,
            expires_at,
            created_at: Utc::now(),
        })
    }

    #[instrument(skip(self), fields(intent_id = %intent_id))]
    async fn check_status(&self, intent_id: &str) -> PaymentResult<PaymentStatus> {
        let url = format!("{}/api/payment/status/{}", self.config.base_url(), intent_id);
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(gateway_error(status, &body));
        }

        let wire: StatusResponseWire = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse status response: {}", e))
        })?;

        if !wire.success {
            return Err(PaymentError::Gateway {
                message: wire
                    .error
                    .unwrap_or_else(|| "status check failed".to_string()),
            });
        }

        let payment_status = wire.payment_status.ok_or_else(|| {
            PaymentError::Serialization("status response missing payment_status".to_string())
        })?;

        debug!(status = %payment_status.status, "polled intent status");
        Ok(payment_status.status)
    }

    #[instrument(skip(self))]
    async fn list_methods(&self) -> PaymentResult<Vec<MethodInfo>> {
        let url = format!("{}/api/payment/methods", self.config.base_url());
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(gateway_error(status, &body));
        }

        let wire: MethodsResponseWire = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse methods response: {}", e))
        })?;

        Ok(wire.methods)
    }
}

fn gateway_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    // Error bodies are {success:false, error} when the backend produced
    // them, arbitrary text when a proxy did.
    if let Ok(wire) = serde_json::from_str::<ErrorResponseWire>(body) {
        if let Some(message) = wire.error {
            return PaymentError::Gateway { message };
        }
    }
    PaymentError::Gateway {
        message: format!("HTTP {}: {}", status, body),
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreatePaymentWire {
    amount: i64,
    currency: Currency,
    user_id: String,
    user_email: String,
    user_name: String,
    description: String,
    plan_id: String,
    billing_cycle: &'static str,
    payment_method: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreateResponseWire {
    success: bool,
    #[serde(default)]
    payment_id: Option<String>,
    #[serde(default)]
    payment_url: Option<String>,
    #[serde(default)]
    qr_code_url: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponseWire {
    success: bool,
    #[serde(default)]
    payment_status: Option<StatusBodyWire>,
    #[serde(default)]
    error: Option<String>,
}

/// The status payload carries more than we consume; everything beyond
/// `status` is ignored.
#[derive(Debug, Deserialize)]
struct StatusBodyWire {
    status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
struct MethodsResponseWire {
    #[allow(dead_code)]
    success: bool,
    #[serde(default)]
    methods: Vec<MethodInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseWire {
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;
    use flow_core::{Amount, BillingCycle, CheckoutRequest, PaymentMethod};
    use std::sync::Arc;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpIntentClient {
        HttpIntentClient::new(
            GatewayConfig::new(server.uri()),
            Arc::new(StaticIdentity::new("usr_42", "dev@careerforge.io", "Dev")),
        )
    }

    fn upi_request() -> IntentRequest {
        let checkout = CheckoutRequest::new(
            Amount::new(599, Currency::INR),
            "pro-monthly",
            BillingCycle::Monthly,
        )
        .with_description("Pro plan");
        IntentRequest::new(&checkout, PaymentMethod::Upi)
    }

    #[tokio::test]
    async fn test_create_parses_upi_intent() {
        let server = MockServer::start().await;
        let expires_at = (Utc::now() + chrono::Duration::seconds(900)).to_rfc3339();

        Mock::given(method("POST"))
            .and(path("/api/payment/create"))
            .and(header_exists("Idempotency-Key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "payment_id": "pay_abc123",
                "payment_url": "https://gateway.test/pay/pay_abc123",
                "qr_code_url": "https://gateway.test/qr/pay_abc123.png",
                "expires_at": expires_at,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = client_for(&server)
            .create_intent(&upi_request())
            .await
            .unwrap();

        assert_eq!(intent.id, "pay_abc123");
        assert!(intent.has_qr());
        assert_eq!(intent.amount.minor, 599);
        assert!(intent.remaining_secs() > 890);
    }

    #[tokio::test]
    async fn test_create_maps_gateway_refusal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/payment/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "plan not purchasable",
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_intent(&upi_request())
            .await
            .unwrap_err();

        match err {
            PaymentError::Gateway { message } => assert_eq!(message, "plan not purchasable"),
            other => panic!("expected gateway error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_maps_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/payment/create"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_intent(&upi_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Gateway { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_before_wire() {
        let server = MockServer::start().await;

        // No mock mounted: a request hitting the server would 404 and the
        // expect(0) below would flag it.
        Mock::given(method("POST"))
            .and(path("/api/payment/create"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut request = upi_request();
        request.amount = Amount::new(0, Currency::INR);

        let err = client_for(&server).create_intent(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_check_status_maps_gateway_spelling() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payment/status/pay_abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "payment_status": { "status": "authorized", "amount": 599 },
            })))
            .mount(&server)
            .await;

        let status = client_for(&server).check_status("pay_abc123").await.unwrap();
        assert_eq!(status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn test_network_failure_is_network_error() {
        // Nothing listens here
        let client = HttpIntentClient::new(
            GatewayConfig::new("http://127.0.0.1:9"),
            Arc::new(StaticIdentity::new("usr_42", "dev@careerforge.io", "Dev")),
        );

        let err = client.check_status("pay_abc123").await.unwrap_err();
        assert!(matches!(err, PaymentError::Network(_)));
    }

    #[tokio::test]
    async fn test_list_methods() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/payment/methods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "methods": [
                    { "id": "upi", "name": "UPI", "features": ["Instant payment"] },
                    { "id": "card", "name": "Credit/Debit Card", "enabled": false },
                ],
            })))
            .mount(&server)
            .await;

        let methods = client_for(&server).list_methods().await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].id, PaymentMethod::Upi);
        assert!(!methods[1].enabled);
    }
}
