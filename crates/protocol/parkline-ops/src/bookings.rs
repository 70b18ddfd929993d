//! Booking read queries.

use parkline_store::BookingLedger;
use parkline_types::{Booking, ListingId, SessionId, UserId};

use crate::error::{OpsError, OpsResult};
use crate::marketplace::Marketplace;

impl Marketplace {
    /// Bookings made by a guest, newest first.
    pub fn bookings_for_user(&self, user_id: &UserId) -> OpsResult<Vec<Booking>> {
        Ok(self.state.bookings.list_for_user(user_id)?)
    }

    /// Bookings on every listing a host owns, newest first.
    pub fn bookings_for_host(&self, host_id: &UserId) -> OpsResult<Vec<Booking>> {
        Ok(self.state.bookings.list_for_host(host_id)?)
    }

    /// Bookings on one listing. Only the listing's host may ask.
    pub fn bookings_for_listing(
        &self,
        host_id: &UserId,
        listing_id: &ListingId,
    ) -> OpsResult<Vec<Booking>> {
        self.owned_listing(host_id, listing_id)?;
        Ok(self.state.bookings.list_for_listing(listing_id)?)
    }

    /// The booking paid for by a session, visible only to its guest.
    pub fn booking_for_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> OpsResult<Option<Booking>> {
        match self.state.bookings.get_by_session(session_id)? {
            Some(booking) if &booking.user_id != user_id => Err(OpsError::unauthorized(
                format!("booking for session {} belongs to another user", session_id),
            )),
            other => Ok(other),
        }
    }
}
