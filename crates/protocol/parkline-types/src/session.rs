//! Checkout session types.
//!
//! Sessions are owned by the external payment provider. Parkline never
//! persists them; it only reads them back when the guest returns.

use serde::{Deserialize, Serialize};

use crate::enums::PaymentStatus;
use crate::ids::{ListingId, SessionId, SpotId, UserId};
use crate::Amount;

/// Correlation data embedded in a checkout session at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionMetadata {
    /// Listing being booked
    pub listing_id: ListingId,
    /// Guest who opened the session
    pub user_id: UserId,
    /// Spot of the listing
    pub spot_id: SpotId,
    /// Listing price at session creation
    pub price_snapshot: Amount,
}

impl SessionMetadata {
    pub fn new(
        listing_id: ListingId,
        user_id: UserId,
        spot_id: SpotId,
        price_snapshot: Amount,
    ) -> Self {
        Self {
            listing_id,
            user_id,
            spot_id,
            price_snapshot,
        }
    }
}

/// A checkout session as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckoutSession {
    /// Provider session id
    pub id: SessionId,
    /// URL the guest is sent to for payment
    pub redirect_url: String,
    /// Correlation metadata
    pub metadata: SessionMetadata,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Amount the provider reports for the session, if any
    pub amount_total: Option<Amount>,
}

impl CheckoutSession {
    /// Create a session whose reported total equals the price snapshot.
    pub fn new(
        id: SessionId,
        redirect_url: impl Into<String>,
        metadata: SessionMetadata,
        payment_status: PaymentStatus,
    ) -> Self {
        let amount_total = Some(metadata.price_snapshot);
        Self {
            id,
            redirect_url: redirect_url.into(),
            metadata,
            payment_status,
            amount_total,
        }
    }

    /// Returns true if the provider reports the session as paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status.is_paid()
    }

    /// Returns true if the session was opened by `user`.
    pub fn belongs_to(&self, user: &UserId) -> bool {
        &self.metadata.user_id == user
    }
}
