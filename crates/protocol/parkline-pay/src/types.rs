//! Request types for payment providers.

use parkline_types::{Amount, ListingId, SessionMetadata, SpotId, UserId};
use serde::{Deserialize, Serialize};

/// Everything a provider needs to open a checkout session for one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Listing being booked
    pub listing_id: ListingId,
    /// Guest paying
    pub user_id: UserId,
    /// Spot of the listing
    pub spot_id: SpotId,
    /// Price per space in minor units, snapshotted from the listing
    pub unit_amount: Amount,
    /// ISO 4217 currency code (lowercase)
    pub currency: String,
    /// Line item name shown on the payment page
    pub product_name: String,
    /// Line item description shown on the payment page
    pub description: Option<String>,
    /// Where the provider sends the guest after paying
    pub success_url: String,
    /// Where the provider sends the guest after cancelling
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Correlation metadata to embed in the session.
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata::new(
            self.listing_id.clone(),
            self.user_id.clone(),
            self.spot_id.clone(),
            self.unit_amount,
        )
    }
}
