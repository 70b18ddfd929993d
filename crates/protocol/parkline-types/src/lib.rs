//! Data structures for the Parkline marketplace.
//!
//! This crate provides the types shared by every Parkline crate: listings,
//! capacity snapshots, checkout sessions and bookings. It contains no
//! business logic, only type definitions with serialization support.
//!
//! # Module Organization
//!
//! - [`ids`] - Identifier newtypes and generators
//! - [`enums`] - Status enumerations
//! - [`listing`] - Listings, capacity snapshots and event windows
//! - [`session`] - Externally hosted checkout sessions
//! - [`booking`] - Confirmed bookings
//! - [`constants`] - Marketplace constants
//! - [`error`] - Error codes and the shared error type
//!
//! # Example
//!
//! ```
//! use parkline_types::{Listing, ListingStatus, EventWindow, SpotId, UserId};
//!
//! let listing = Listing::new(
//!     SpotId::new("spot_1"),
//!     UserId::new("host_1"),
//!     "Lot B",
//!     1250,
//!     3,
//!     EventWindow::new(1_700_000_000_000, 1_700_010_000_000),
//!     1_699_000_000_000,
//! )
//! .with_event_name("Home opener");
//!
//! assert_eq!(listing.status, ListingStatus::Active);
//! assert_eq!(listing.capacity().remaining(), 3);
//! ```

/// Crate version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod booking;
pub mod constants;
pub mod enums;
pub mod error;
pub mod ids;
pub mod listing;
pub mod session;

pub use booking::Booking;
pub use constants::*;
pub use enums::{BookingStatus, ListingStatus, PaymentStatus};
pub use error::{ErrorCode, ParklineError, Result};
pub use ids::{BookingId, ListingId, SessionId, SpotId, UserId};
pub use listing::{Capacity, EventWindow, Listing};
pub use session::{CheckoutSession, SessionMetadata};

/// Amount in minor currency units (cents for `usd`).
///
/// All prices and totals are stored as integers to avoid floating point
/// rounding when snapshotting a listing price into a checkout session.
pub type Amount = u64;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Get current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or_default()
}
