//! # User Identity
//!
//! Explicit identity injection for the intent client. The backend wants to
//! know who is paying; the client gets that from an injected provider
//! rather than ambient global state, so tests and embedders control it.

use flow_core::PaymentError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The paying user, as the backend expects to see them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// Source of the current user's identity
pub trait IdentityProvider: Send + Sync {
    fn identity(&self) -> UserIdentity;
}

/// Type alias for a shared identity provider
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;

/// Fixed identity, set once at construction
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    identity: UserIdentity,
}

impl StaticIdentity {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            identity: UserIdentity {
                user_id: user_id.into(),
                email: email.into(),
                name: name.into(),
            },
        }
    }

    /// Load from `CHECKOUT_USER_ID` / `CHECKOUT_USER_EMAIL` / `CHECKOUT_USER_NAME`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let user_id = std::env::var("CHECKOUT_USER_ID")
            .map_err(|_| PaymentError::Configuration("CHECKOUT_USER_ID not set".to_string()))?;
        let email = std::env::var("CHECKOUT_USER_EMAIL")
            .map_err(|_| PaymentError::Configuration("CHECKOUT_USER_EMAIL not set".to_string()))?;
        let name = std::env::var("CHECKOUT_USER_NAME").unwrap_or_else(|_| email.clone());

        Ok(Self::new(user_id, email, name))
    }
}

impl IdentityProvider for StaticIdentity {
    fn identity(&self) -> UserIdentity {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        let provider = StaticIdentity::new("usr_42", "dev@careerforge.io", "Dev");
        let identity = provider.identity();

        assert_eq!(identity.user_id, "usr_42");
        assert_eq!(identity.email, "dev@careerforge.io");
        assert_eq!(identity.name, "Dev");
    }
}
