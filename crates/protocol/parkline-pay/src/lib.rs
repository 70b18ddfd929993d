//! Payment provider adapters for Parkline.
//!
//! This crate abstracts the externally hosted checkout step behind the
//! [`PaymentGateway`] trait. It carries no business rules; it opens
//! sessions and reports what the provider says about them.
//!
//! # Implementations
//!
//! - [`MockGateway`]: in-memory (optionally file-mirrored) sessions for
//!   tests and local development
//! - [`StripeGateway`]: Stripe Checkout over HTTPS
//!
//! # Example
//!
//! ```
//! use parkline_pay::{CheckoutRequest, MockGateway, PaymentGateway};
//! use parkline_types::{ListingId, SpotId, UserId};
//!
//! # tokio_test_block_on(async {
//! let gateway = MockGateway::new();
//! let request = CheckoutRequest {
//!     listing_id: ListingId::new("lst_1"),
//!     user_id: UserId::new("guest_1"),
//!     spot_id: SpotId::new("spot_1"),
//!     unit_amount: 1500,
//!     currency: "usd".to_string(),
//!     product_name: "Parking".to_string(),
//!     description: None,
//!     success_url: "https://app.example/success".to_string(),
//!     cancel_url: "https://app.example/cancel".to_string(),
//! };
//!
//! let session = gateway.create_session(&request).await.unwrap();
//! gateway.mark_paid(&session.id).unwrap();
//!
//! let fetched = gateway.retrieve_session(&session.id).await.unwrap().unwrap();
//! assert!(fetched.is_paid());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod error;
pub mod mock;
pub mod retry;
pub mod stripe;
pub mod traits;
pub mod types;

pub use config::{GatewayConfig, ProviderKind, RetryConfig, STRIPE_API_BASE};
pub use error::{PayError, PayResult};
pub use mock::{MockGateway, MockGatewayBuilder};
pub use retry::RetryPolicy;
pub use stripe::StripeGateway;
pub use traits::PaymentGateway;
pub use types::CheckoutRequest;

use std::sync::Arc;

/// Build the gateway selected by `config`.
pub fn build_gateway(config: &GatewayConfig) -> PayResult<Arc<dyn PaymentGateway>> {
    config.validate()?;
    match config.provider {
        ProviderKind::Mock => match &config.mock_state_path {
            Some(path) => Ok(Arc::new(MockGateway::open(path)?)),
            None => Ok(Arc::new(MockGateway::new())),
        },
        ProviderKind::Stripe => Ok(Arc::new(StripeGateway::new(config)?)),
    }
}
