//! Store-specific types.
//!
//! This module defines types used by the storage layer that are not
//! part of the shared domain types.

use parkline_types::{Booking, Capacity, ListingStatus, SpotId, UserId};

/// Filter criteria for listing queries.
///
/// All fields are optional. When a field is `None`, no filtering
/// is applied for that criterion.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Filter by spot.
    pub spot_id: Option<SpotId>,
    /// Filter by host.
    pub host_id: Option<UserId>,
    /// Filter by status.
    pub status: Option<ListingStatus>,
    /// Maximum number of results to return.
    pub limit: Option<u32>,
    /// Number of results to skip (for pagination).
    pub offset: Option<u32>,
}

impl ListingFilter {
    /// Create a new empty filter (matches all listings).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by spot.
    pub fn with_spot(mut self, spot_id: SpotId) -> Self {
        self.spot_id = Some(spot_id);
        self
    }

    /// Filter by host.
    pub fn with_host(mut self, host_id: UserId) -> Self {
        self.host_id = Some(host_id);
        self
    }

    /// Filter by status.
    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only active listings.
    pub fn active(self) -> Self {
        self.with_status(ListingStatus::Active)
    }

    /// Limit the number of results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip a number of results (for pagination).
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Result of a conditional capacity increment.
///
/// Contention is reported as a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// One space was taken; carries the capacity after the increment.
    Reserved(Capacity),
    /// Every space was already booked; nothing changed.
    AtCapacity,
    /// No listing with that id.
    NotFound,
}

impl ReserveOutcome {
    /// Returns true if a space was taken.
    pub fn is_reserved(&self) -> bool {
        matches!(self, ReserveOutcome::Reserved(_))
    }
}

/// Result of an idempotent ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    /// The booking was inserted.
    Created(Booking),
    /// A booking for the same session already existed and is returned as stored.
    Existing(Booking),
}

impl LedgerWrite {
    /// The stored booking, whichever way it got there.
    pub fn booking(&self) -> &Booking {
        match self {
            LedgerWrite::Created(b) | LedgerWrite::Existing(b) => b,
        }
    }

    /// Consume and return the stored booking.
    pub fn into_booking(self) -> Booking {
        match self {
            LedgerWrite::Created(b) | LedgerWrite::Existing(b) => b,
        }
    }

    /// Returns true if this call inserted the booking.
    pub fn was_created(&self) -> bool {
        matches!(self, LedgerWrite::Created(_))
    }
}

/// Result of committing a paid booking against listing capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Capacity was incremented and the booking written.
    Created {
        /// The stored booking.
        booking: Booking,
        /// Listing capacity after the increment.
        capacity: Capacity,
    },
    /// The session already had a booking; nothing changed.
    Existing(Booking),
    /// The listing had no space left; nothing changed.
    CapacityExceeded,
    /// The listing no longer exists; nothing changed.
    ListingMissing,
}
