//! # Gateway Client Configuration
//!
//! Configuration for the payment backend connection.
//! Secrets are loaded from environment variables.

use flow_core::PaymentError;
use std::env;
use std::time::Duration;

/// Payment backend API configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the payment backend (e.g., "https://api.careerforge.io")
    pub api_base_url: String,

    /// Optional bearer token for authenticated deployments
    pub api_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CHECKOUT_API_BASE_URL`
    ///
    /// Optional:
    /// - `CHECKOUT_API_TOKEN`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("CHECKOUT_API_BASE_URL").map_err(|_| {
            PaymentError::Configuration("CHECKOUT_API_BASE_URL not set".to_string())
        })?;

        let api_token = env::var("CHECKOUT_API_TOKEN").ok();

        let config = Self {
            api_base_url,
            api_token,
            timeout: Duration::from_secs(30),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with an explicit base URL (for testing)
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Builder: set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), PaymentError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(PaymentError::Configuration(format!(
                "CHECKOUT_API_BASE_URL must be an http(s) URL, got {}",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// Base URL with any trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
