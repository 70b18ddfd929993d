//! Confirmation reconciler.
//!
//! Invoked when the guest returns from the payment page with a session id.
//! Payment facts are always re-fetched from the provider; the session id
//! is the only thing trusted from the caller.

use parkline_store::{BookingLedger, CommitOutcome, ListingStore};
use parkline_types::{
    current_timestamp, Amount, Booking, BookingId, ListingId, PaymentStatus, SessionId, UserId,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{OpsError, OpsResult};
use crate::marketplace::Marketplace;

/// Read-only view of a checkout session's payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionVerification {
    /// Session checked.
    pub session_id: SessionId,
    /// Whether the provider reports the session as paid.
    pub paid: bool,
    /// Provider payment status.
    pub status: PaymentStatus,
    /// Listing the session was opened for.
    pub listing_id: ListingId,
    /// Amount reported by the provider.
    pub amount_total: Option<Amount>,
    /// Booking already recorded for the session, if any.
    pub booking_id: Option<BookingId>,
}

impl Marketplace {
    /// Confirm a paid checkout session and record its booking exactly once.
    ///
    /// 1. The session is fetched from the provider; unknown sessions fail
    ///    with [`OpsError::SessionNotFound`].
    /// 2. If the session already has a booking it is returned unchanged,
    ///    provided it belongs to `user_id`, even if the provider now reports
    ///    the session as expired. Otherwise an expired session fails with
    ///    [`OpsError::SessionNotFound`].
    /// 3. The session must have been opened by `user_id`.
    /// 4. The session must be paid.
    /// 5. One space is taken on the listing, the booking is written at the
    ///    snapshotted price and the listing is marked full if this filled
    ///    it, all in one store transaction. A full listing yields
    ///    [`OpsError::CapacityExceeded`], which requires a refund.
    pub async fn confirm(&self, session_id: &SessionId, user_id: &UserId) -> OpsResult<Booking> {
        let session = self
            .gateway()
            .retrieve_session(session_id)
            .await?
            .ok_or_else(|| OpsError::SessionNotFound(session_id.clone()))?;

        if let Some(existing) = self.state.bookings.get_by_session(session_id)? {
            return self.replay(existing, user_id);
        }

        if session.payment_status == PaymentStatus::Expired {
            debug!(session_id = %session_id, "Confirmation of expired session");
            return Err(OpsError::SessionNotFound(session_id.clone()));
        }

        if !session.belongs_to(user_id) {
            warn!(
                session_id = %session_id,
                requesting_user = %user_id,
                session_user = %session.metadata.user_id,
                "Confirmation attempted by a user who did not open the session"
            );
            return Err(OpsError::unauthorized(format!(
                "session {} belongs to another user",
                session_id
            )));
        }

        if !session.is_paid() {
            return Err(OpsError::PaymentIncomplete {
                session_id: session_id.clone(),
                status: session.payment_status,
            });
        }

        if let Some(total) = session.amount_total {
            if total != session.metadata.price_snapshot {
                warn!(
                    session_id = %session_id,
                    amount_total = total,
                    price_snapshot = session.metadata.price_snapshot,
                    "Provider total differs from price snapshot"
                );
            }
        }

        let listing_id = session.metadata.listing_id.clone();
        let Some(listing) = self.state.listings.get(&listing_id)? else {
            return Err(self.capacity_exceeded(&listing_id, session_id, user_id, "listing missing"));
        };

        let booking = Booking::from_session(&session, &listing.window, current_timestamp());
        match self.state.commit_booking(&booking)? {
            CommitOutcome::Created { booking, capacity } => {
                info!(
                    booking_id = %booking.id,
                    session_id = %session_id,
                    listing_id = %listing_id,
                    user_id = %user_id,
                    total_price = booking.total_price,
                    booked = capacity.booked_spaces,
                    total = capacity.spaces_available,
                    status = %capacity.status,
                    "Booking confirmed"
                );
                Ok(booking)
            }
            // Lost a race with a concurrent confirmation of the same session
            CommitOutcome::Existing(existing) => self.replay(existing, user_id),
            CommitOutcome::CapacityExceeded => {
                Err(self.capacity_exceeded(&listing_id, session_id, user_id, "listing full"))
            }
            CommitOutcome::ListingMissing => {
                Err(self.capacity_exceeded(&listing_id, session_id, user_id, "listing missing"))
            }
        }
    }

    /// Report a session's payment state without changing anything.
    pub async fn verify_session(&self, session_id: &SessionId) -> OpsResult<SessionVerification> {
        let session = self
            .gateway()
            .retrieve_session(session_id)
            .await?
            .ok_or_else(|| OpsError::SessionNotFound(session_id.clone()))?;

        let booking_id = self
            .state
            .bookings
            .get_by_session(session_id)?
            .map(|b| b.id);

        Ok(SessionVerification {
            session_id: session.id.clone(),
            paid: session.is_paid(),
            status: session.payment_status,
            listing_id: session.metadata.listing_id.clone(),
            amount_total: session.amount_total,
            booking_id,
        })
    }

    fn replay(&self, existing: Booking, user_id: &UserId) -> OpsResult<Booking> {
        if &existing.user_id != user_id {
            warn!(
                session_id = %existing.session_id,
                booking_id = %existing.id,
                requesting_user = %user_id,
                "Replay of another user's booking refused"
            );
            return Err(OpsError::unauthorized(format!(
                "booking for session {} belongs to another user",
                existing.session_id
            )));
        }

        debug!(
            session_id = %existing.session_id,
            booking_id = %existing.id,
            "Returning existing booking for replayed confirmation"
        );
        Ok(existing)
    }

    fn capacity_exceeded(
        &self,
        listing_id: &ListingId,
        session_id: &SessionId,
        user_id: &UserId,
        reason: &str,
    ) -> OpsError {
        error!(
            session_id = %session_id,
            listing_id = %listing_id,
            user_id = %user_id,
            reason,
            requires_refund = true,
            "Paid session could not be honoured"
        );
        OpsError::CapacityExceeded {
            listing_id: listing_id.clone(),
            session_id: session_id.clone(),
        }
    }
}
