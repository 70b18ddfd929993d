//! Checkout session broker.
//!
//! Opens a payment session for one space on a listing. The listing price
//! is snapshotted into the session metadata; no capacity is held.

use parkline_pay::CheckoutRequest;
use parkline_store::ListingStore;
use parkline_types::{Amount, Listing, ListingId, SessionId, UserId};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CheckoutConfig;
use crate::error::{OpsError, OpsResult};
use crate::marketplace::Marketplace;

/// What the guest needs to go and pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutHandle {
    /// Provider session id, to be passed back on confirmation.
    pub session_id: SessionId,
    /// Payment page URL.
    pub redirect_url: String,
    /// Price the guest will be charged.
    pub price_snapshot: Amount,
}

impl CheckoutConfig {
    /// Build the provider request for one space on `listing`.
    pub fn request_for(&self, listing: &Listing, user_id: &UserId) -> CheckoutRequest {
        let product_name = if listing.title.trim().is_empty() {
            self.product_name.clone()
        } else {
            format!("{}: {}", self.product_name, listing.title)
        };
        let description = if listing.event_name.trim().is_empty() {
            None
        } else {
            Some(listing.event_name.clone())
        };

        CheckoutRequest {
            listing_id: listing.id.clone(),
            user_id: user_id.clone(),
            spot_id: listing.spot_id.clone(),
            unit_amount: listing.price,
            currency: self.currency.to_ascii_lowercase(),
            product_name,
            description,
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        }
    }
}

impl Marketplace {
    /// Open a checkout session for `user_id` on `listing_id`.
    ///
    /// Fails with [`OpsError::ListingUnavailable`] if the listing is
    /// missing, inactive or full. Availability is checked but not held, so
    /// more sessions than remaining spaces may be issued; the reconciler
    /// enforces capacity when they are confirmed.
    pub async fn create_session(
        &self,
        user_id: &UserId,
        listing_id: &ListingId,
    ) -> OpsResult<CheckoutHandle> {
        if user_id.is_blank() {
            return Err(OpsError::unauthorized("a signed-in user is required"));
        }

        let listing = self
            .state
            .listings
            .get(listing_id)?
            .ok_or_else(|| OpsError::ListingUnavailable(listing_id.clone()))?;

        let capacity = listing.capacity();
        if !capacity.accepts_checkout() {
            debug!(
                listing_id = %listing_id,
                status = %capacity.status,
                remaining = capacity.remaining(),
                "Checkout refused for unavailable listing"
            );
            return Err(OpsError::ListingUnavailable(listing_id.clone()));
        }

        let request = self.config.checkout.request_for(&listing, user_id);
        let session = self.gateway().create_session(&request).await?;

        info!(
            session_id = %session.id,
            listing_id = %listing_id,
            user_id = %user_id,
            price = request.unit_amount,
            provider = self.gateway().provider_name(),
            "Checkout session created"
        );

        Ok(CheckoutHandle {
            session_id: session.id,
            redirect_url: session.redirect_url,
            price_snapshot: session.metadata.price_snapshot,
        })
    }
}
