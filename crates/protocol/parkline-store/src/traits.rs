//! Trait definitions for storage components.
//!
//! Implementations may vary (e.g., in-memory vs SQLite) but must satisfy
//! these interfaces. Every method takes `&self` so a single store can be
//! shared across concurrent callers.

use parkline_types::{
    Amount, Booking, BookingId, Capacity, Listing, ListingId, SessionId, Timestamp, UserId,
};

use crate::error::Result;
use crate::types::{LedgerWrite, ListingFilter, ReserveOutcome};

// =============================================================================
// Listing Capacity Store
// =============================================================================

/// Persistent listings with a bounded, atomic capacity increment.
pub trait ListingStore {
    /// Insert a new listing.
    ///
    /// Returns an error if a listing with the same id exists.
    fn insert(&self, listing: &Listing) -> Result<()>;

    /// Load a listing by id.
    ///
    /// Returns `None` if the listing doesn't exist.
    fn get(&self, id: &ListingId) -> Result<Option<Listing>>;

    /// Read the capacity counters and status of a listing.
    fn capacity(&self, id: &ListingId) -> Result<Option<Capacity>>;

    /// Take one space if `booked_spaces < spaces_available`.
    ///
    /// The check and the increment happen in a single statement. When the
    /// increment reaches capacity an active listing becomes full.
    fn try_reserve_one(&self, id: &ListingId) -> Result<ReserveOutcome>;

    /// List listings matching filter criteria, newest first.
    fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>>;

    /// Change the price of a listing.
    ///
    /// Returns [`StoreError::ListingNotFound`](crate::StoreError::ListingNotFound)
    /// if the listing doesn't exist.
    fn update_price(&self, id: &ListingId, price: Amount, now: Timestamp) -> Result<()>;

    /// Mark a listing inactive. Capacity counters are left untouched.
    fn deactivate(&self, id: &ListingId, now: Timestamp) -> Result<()>;
}

// =============================================================================
// Booking Ledger
// =============================================================================

/// Append-only record of confirmed bookings, unique per checkout session.
pub trait BookingLedger {
    /// Insert the booking unless one already exists for its session.
    ///
    /// Never modifies an existing booking.
    fn create_if_absent(&self, booking: &Booking) -> Result<LedgerWrite>;

    /// Load a booking by id.
    fn get(&self, id: &BookingId) -> Result<Option<Booking>>;

    /// Load the booking paid for by a checkout session.
    fn get_by_session(&self, session_id: &SessionId) -> Result<Option<Booking>>;

    /// All bookings made by a guest, newest first.
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>>;

    /// All bookings against a listing, newest first.
    fn list_for_listing(&self, listing_id: &ListingId) -> Result<Vec<Booking>>;

    /// All bookings against listings owned by a host, newest first.
    fn list_for_host(&self, host_id: &UserId) -> Result<Vec<Booking>>;
}
