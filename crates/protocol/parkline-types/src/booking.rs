//! Booking types.

use serde::{Deserialize, Serialize};

use crate::enums::BookingStatus;
use crate::ids::{BookingId, ListingId, SessionId, SpotId, UserId};
use crate::listing::EventWindow;
use crate::session::CheckoutSession;
use crate::{Amount, Timestamp};

/// A confirmed reservation of one space on a listing.
///
/// At most one booking exists per checkout session. The session id is
/// also exposed as the booking's payment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Guest who paid
    pub user_id: UserId,
    /// Listing booked
    pub listing_id: ListingId,
    /// Spot of the listing
    pub spot_id: SpotId,
    /// Price paid, copied from the session's price snapshot
    pub total_price: Amount,
    /// Checkout session that paid for this booking
    pub session_id: SessionId,
    /// Booking status
    pub status: BookingStatus,
    /// Event window copied from the listing
    pub window: EventWindow,
    /// Creation timestamp
    pub created_at: Timestamp,
}

impl Booking {
    /// Build a paid booking from a checkout session and the listing window.
    pub fn from_session(
        session: &CheckoutSession,
        window: &EventWindow,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: BookingId::generate(),
            user_id: session.metadata.user_id.clone(),
            listing_id: session.metadata.listing_id.clone(),
            spot_id: session.metadata.spot_id.clone(),
            total_price: session.metadata.price_snapshot,
            session_id: session.id.clone(),
            status: BookingStatus::Paid,
            window: *window,
            created_at,
        }
    }

    /// Payment reference for this booking.
    pub fn payment_id(&self) -> &SessionId {
        &self.session_id
    }
}
