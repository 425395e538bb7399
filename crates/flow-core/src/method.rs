//! # Payment Methods
//!
//! Method capability data for the checkout UI.
//! The catalog is static data only; it never participates in the state
//! machine. Loaded from `config/methods.toml` when present, with a built-in
//! default matching the gateway's domestic offering.

use serde::{Deserialize, Serialize};

/// A payment method the gateway can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// UPI apps (Google Pay, PhonePe, Paytm)
    Upi,
    /// Credit or debit card
    Card,
    /// Bank net banking
    NetBanking,
    /// Digital wallets
    Wallet,
    /// Monthly installments
    Emi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::NetBanking => "net_banking",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Emi => "emi",
        }
    }

    /// UPI intents carry a scannable QR code in addition to the redirect URL
    pub fn supports_qr(&self) -> bool {
        matches!(self, PaymentMethod::Upi)
    }

    /// Domestic rails only accept INR
    pub fn requires_inr(&self) -> bool {
        matches!(self, PaymentMethod::Upi | PaymentMethod::NetBanking)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "net_banking" => Ok(PaymentMethod::NetBanking),
            "wallet" => Ok(PaymentMethod::Wallet),
            "emi" => Ok(PaymentMethod::Emi),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// Display metadata for one payment method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Method identifier
    pub id: PaymentMethod,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Selling points shown under the method
    #[serde(default)]
    pub features: Vec<String>,

    /// Whether this method is offered
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl MethodInfo {
    pub fn new(id: PaymentMethod, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            features: Vec::new(),
            enabled: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: add a feature line
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }
}

/// Method catalog (loaded from config, or the built-in default)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodCatalog {
    pub methods: Vec<MethodInfo>,
}

impl MethodCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Add a method to the catalog
    pub fn add(&mut self, method: MethodInfo) {
        self.methods.push(method);
    }

    /// Find a method by id
    pub fn get(&self, id: PaymentMethod) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.id == id)
    }

    /// All methods currently offered
    pub fn enabled_methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().filter(|m| m.enabled)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The gateway's standard domestic offering
    pub fn built_in() -> Self {
        Self {
            methods: vec![
                MethodInfo::new(PaymentMethod::Upi, "UPI")
                    .with_description("Pay using UPI apps like Google Pay, PhonePe, Paytm")
                    .with_feature("Instant payment")
                    .with_feature("QR code available")
                    .with_feature("No additional charges"),
                MethodInfo::new(PaymentMethod::Card, "Credit/Debit Card")
                    .with_description("Pay using credit or debit cards")
                    .with_feature("Secure 3D authentication")
                    .with_feature("All major cards accepted"),
                MethodInfo::new(PaymentMethod::NetBanking, "Net Banking")
                    .with_description("Pay using your bank's net banking")
                    .with_feature("Direct bank transfer")
                    .with_feature("All major banks supported"),
                MethodInfo::new(PaymentMethod::Wallet, "Digital Wallets")
                    .with_description("Pay using digital wallets like Paytm, PhonePe")
                    .with_feature("Instant payment")
                    .with_feature("Easy top-up"),
                MethodInfo::new(PaymentMethod::Emi, "EMI")
                    .with_description("Pay in easy monthly installments")
                    .with_feature("Flexible tenure")
                    .with_feature("Instant approval"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_catalog() {
        let catalog = MethodCatalog::built_in();
        assert_eq!(catalog.methods.len(), 5);
        assert_eq!(catalog.enabled_methods().count(), 5);

        let upi = catalog.get(PaymentMethod::Upi).unwrap();
        assert!(upi.id.supports_qr());
        assert!(!upi.features.is_empty());
    }

    #[test]
    fn test_method_capabilities() {
        assert!(PaymentMethod::Upi.supports_qr());
        assert!(!PaymentMethod::Card.supports_qr());
        assert!(PaymentMethod::Upi.requires_inr());
        assert!(PaymentMethod::NetBanking.requires_inr());
        assert!(!PaymentMethod::Card.requires_inr());
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_str = r#"
            [[methods]]
            id = "upi"
            name = "UPI"
            features = ["Instant payment"]

            [[methods]]
            id = "card"
            name = "Card"
            enabled = false
        "#;

        let catalog = MethodCatalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.methods.len(), 2);
        assert_eq!(catalog.enabled_methods().count(), 1);
        assert_eq!(catalog.get(PaymentMethod::Upi).unwrap().name, "UPI");
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(
            "net_banking".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::NetBanking
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
