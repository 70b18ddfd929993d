//! The `Marketplace` orchestrator.
//!
//! `Marketplace` ties the persistent state to a payment gateway. The
//! operations themselves live in sibling modules as `impl Marketplace`
//! blocks: [`broker`](crate::broker), [`reconciler`](crate::reconciler),
//! [`listings`](crate::listings) and [`bookings`](crate::bookings).

use std::sync::Arc;

use parkline_pay::PaymentGateway;
use parkline_store::MarketState;

use crate::config::OpsConfig;

/// Marketplace operations over shared state and a payment gateway.
///
/// Every operation takes `&self`; the type is `Send + Sync` and is meant
/// to be shared behind an `Arc` across tasks.
pub struct Marketplace {
    /// Listing store and booking ledger.
    pub state: MarketState,
    /// Operations configuration.
    pub config: OpsConfig,
    /// Payment provider.
    gateway: Arc<dyn PaymentGateway>,
}

impl Marketplace {
    /// Create a marketplace with the given components.
    pub fn new(state: MarketState, gateway: Arc<dyn PaymentGateway>, config: OpsConfig) -> Self {
        Self {
            state,
            config,
            gateway,
        }
    }

    /// Create a marketplace with default configuration.
    pub fn with_defaults(state: MarketState, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::new(state, gateway, OpsConfig::default())
    }

    /// The payment gateway in use.
    pub fn gateway(&self) -> &Arc<dyn PaymentGateway> {
        &self.gateway
    }
}
