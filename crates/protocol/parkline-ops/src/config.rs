//! Configuration types for the operations layer.

use parkline_types::{DEFAULT_CURRENCY, SESSION_ID_PLACEHOLDER};

use crate::error::{OpsError, OpsResult};

/// Settings for the checkout sessions the broker opens.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Line item name prefix shown on the payment page.
    pub product_name: String,
    /// Where the provider sends the guest after paying. Must contain the
    /// provider's session id placeholder.
    pub success_url: String,
    /// Where the provider sends the guest after cancelling.
    pub cancel_url: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            product_name: "Event parking".to_string(),
            success_url: format!(
                "http://localhost:3000/success?session_id={}",
                SESSION_ID_PLACEHOLDER
            ),
            cancel_url: "http://localhost:3000/cancel".to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the product name.
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Set the success and cancel URLs.
    pub fn with_urls(mut self, success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    /// Validate the checkout settings.
    pub fn validate(&self) -> OpsResult<()> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(OpsError::config(format!(
                "currency must be a three-letter ISO code, got '{}'",
                self.currency
            )));
        }
        if !self.success_url.contains(SESSION_ID_PLACEHOLDER) {
            return Err(OpsError::config(format!(
                "success_url must contain {}",
                SESSION_ID_PLACEHOLDER
            )));
        }
        if self.cancel_url.trim().is_empty() {
            return Err(OpsError::config("cancel_url must not be empty"));
        }
        Ok(())
    }
}

/// Configuration for marketplace operations.
#[derive(Debug, Clone, Default)]
pub struct OpsConfig {
    /// Checkout session settings.
    pub checkout: CheckoutConfig,
}

impl OpsConfig {
    /// Create a new operations configuration.
    pub fn new(checkout: CheckoutConfig) -> Self {
        Self { checkout }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> OpsResult<()> {
        self.checkout.validate()
    }
}
