//! Configuration for payment providers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PayError, PayResult};

/// Default Stripe API base URL.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Payment provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process mock (development and tests)
    Mock,
    /// Stripe Checkout
    #[default]
    Stripe,
}

impl ProviderKind {
    /// Get the provider name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Stripe => "stripe",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = PayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "stripe" => Ok(Self::Stripe),
            other => Err(PayError::config(format!("unknown payment provider: {}", other))),
        }
    }
}

/// Configuration for the payment gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Which provider to talk to
    pub provider: ProviderKind,

    /// Provider API base URL
    pub api_base: String,

    /// Provider secret key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Per-request timeout
    #[serde(with = "millis_serde")]
    pub timeout: Duration,

    /// File the mock provider keeps its sessions in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_state_path: Option<PathBuf>,

    /// Retry policy for idempotent provider reads
    pub retry: RetryConfig,
}

impl GatewayConfig {
    /// Configuration for the in-process mock provider.
    pub fn mock() -> Self {
        Self {
            provider: ProviderKind::Mock,
            ..Self::default()
        }
    }

    /// Configuration for Stripe with the given secret key.
    pub fn stripe(secret_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Stripe,
            secret_key: Some(secret_key.into()),
            ..Self::default()
        }
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the mock state file.
    pub fn with_mock_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mock_state_path = Some(path.into());
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PayResult<()> {
        if self.provider == ProviderKind::Stripe {
            let key = self.secret_key.as_deref().unwrap_or_default().trim();
            if key.is_empty() {
                return Err(PayError::config("stripe provider requires a secret key"));
            }
            if key.contains("${") {
                return Err(PayError::config(
                    "stripe secret key references an unset environment variable",
                ));
            }
        }

        if self.api_base.trim().is_empty() {
            return Err(PayError::config("api_base must not be empty"));
        }

        if self.retry.max_attempts == 0 {
            return Err(PayError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_base: STRIPE_API_BASE.to_string(),
            secret_key: None,
            timeout: Duration::from_secs(30),
            mock_state_path: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay between retries
    #[serde(with = "millis_serde")]
    pub base_delay: Duration,
    /// Maximum delay between retries
    #[serde(with = "millis_serde")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Serde helper for Duration (as milliseconds).
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stripe() {
        let config = GatewayConfig::default();
        assert_eq!(config.provider, ProviderKind::Stripe);
        assert_eq!(config.api_base, STRIPE_API_BASE);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stripe_requires_expanded_key() {
        assert!(GatewayConfig::stripe("sk_test_123").validate().is_ok());
        assert!(GatewayConfig::stripe("  ").validate().is_err());
        assert!(GatewayConfig::stripe("${STRIPE_SECRET_KEY}")
            .validate()
            .is_err());
    }

    #[test]
    fn test_mock_needs_no_key() {
        assert!(GatewayConfig::mock().validate().is_ok());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!("paypal".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_serde_millis() {
        let config = GatewayConfig::mock().with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 1500);
        assert_eq!(json["retry"]["base_delay"], 500);

        let back: GatewayConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Duration::from_millis(1500));
        assert_eq!(back.provider, ProviderKind::Mock);
    }
}
