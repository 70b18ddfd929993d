//! Listing types.
//!
//! A listing is a block of parking spaces offered by a host for one event.
//! Its capacity is tracked as a pair of counters, `spaces_available` (the
//! total) and `booked_spaces`, which must always satisfy
//! `booked_spaces <= spaces_available`.

use serde::{Deserialize, Serialize};

use crate::enums::ListingStatus;
use crate::ids::{ListingId, SpotId, UserId};
use crate::{Amount, Timestamp};

/// Event time window covered by a listing or booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventWindow {
    /// Start of the window (ms since epoch)
    pub start: Timestamp,
    /// End of the window (ms since epoch)
    pub end: Timestamp,
}

impl EventWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Returns true if the window starts strictly before it ends.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

/// Point-in-time view of a listing's capacity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Capacity {
    /// Total spaces offered
    pub spaces_available: u32,
    /// Spaces already booked
    pub booked_spaces: u32,
    /// Listing status at the time of the read
    pub status: ListingStatus,
}

impl Capacity {
    pub fn new(spaces_available: u32, booked_spaces: u32, status: ListingStatus) -> Self {
        Self {
            spaces_available,
            booked_spaces,
            status,
        }
    }

    /// Spaces still open for booking. Never negative.
    pub fn remaining(&self) -> u32 {
        self.spaces_available.saturating_sub(self.booked_spaces)
    }

    /// Returns true if a checkout session may be opened against this listing.
    pub fn accepts_checkout(&self) -> bool {
        self.status == ListingStatus::Active && self.remaining() > 0
    }
}

/// A parking listing published by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Listing {
    /// Listing identifier
    pub id: ListingId,
    /// Spot the spaces belong to
    pub spot_id: SpotId,
    /// Host that owns the spot
    pub host_id: UserId,
    /// Display title
    pub title: String,
    /// Event the listing is tied to
    pub event_name: String,
    /// Price per space in minor units
    pub price: Amount,
    /// Total capacity
    pub spaces_available: u32,
    /// Spaces booked so far
    pub booked_spaces: u32,
    /// Lifecycle status
    pub status: ListingStatus,
    /// Event window
    pub window: EventWindow,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last modification timestamp
    pub updated_at: Timestamp,
}

impl Listing {
    /// Create a new active listing with a generated id and no bookings.
    pub fn new(
        spot_id: SpotId,
        host_id: UserId,
        title: impl Into<String>,
        price: Amount,
        spaces_available: u32,
        window: EventWindow,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ListingId::generate(),
            spot_id,
            host_id,
            title: title.into(),
            event_name: String::new(),
            price,
            spaces_available,
            booked_spaces: 0,
            status: ListingStatus::Active,
            window,
            created_at,
            updated_at: created_at,
        }
    }

    /// Set the event name.
    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    /// Capacity snapshot of this listing.
    pub fn capacity(&self) -> Capacity {
        Capacity::new(self.spaces_available, self.booked_spaces, self.status)
    }

    /// Returns true if `user` is the host of this listing.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.host_id == user
    }
}
