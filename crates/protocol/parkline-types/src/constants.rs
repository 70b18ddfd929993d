//! Marketplace constants.
//!
//! Defaults for checkout sessions, listing validation and identifier
//! formats.

use crate::Amount;

// =============================================================================
// Identifiers
// =============================================================================

/// Prefix for generated listing identifiers.
pub const LISTING_ID_PREFIX: &str = "lst_";

/// Prefix for generated booking identifiers.
pub const BOOKING_ID_PREFIX: &str = "bkg_";

/// Number of random bytes in a generated identifier (24 hex characters).
pub const ID_RANDOM_BYTES: usize = 12;

// =============================================================================
// Checkout
// =============================================================================

/// Default ISO 4217 currency code for checkout sessions.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Placeholder the payment provider substitutes with the session id
/// in the success URL.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Quantity of line items on every checkout session (one space).
pub const SPACES_PER_BOOKING: u32 = 1;

// =============================================================================
// Listing limits
// =============================================================================

/// Smallest accepted listing price (one minor unit).
pub const MIN_LISTING_PRICE: Amount = 1;

/// Largest accepted listing price: 100,000.00 in major units.
pub const MAX_LISTING_PRICE: Amount = 10_000_000;

/// Largest number of spaces a single listing may offer.
pub const MAX_LISTING_SPACES: u32 = 10_000;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Default page size for listing and booking queries.
pub const DEFAULT_QUERY_LIMIT: u32 = 50;
