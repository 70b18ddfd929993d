//! Error types for the operations layer.
//!
//! This module defines the `OpsError` enum used by all operation
//! functions in this crate.

use parkline_pay::PayError;
use parkline_store::StoreError;
use parkline_types::{ErrorCode, ListingId, PaymentStatus, SessionId};
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors that can occur during marketplace operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    // =========================================================================
    // Checkout / Confirmation Errors
    // =========================================================================
    /// Listing missing, inactive or full.
    #[error("listing unavailable: {0}")]
    ListingUnavailable(ListingId),

    /// Checkout session unknown to the provider or expired.
    #[error("checkout session not found: {0}")]
    SessionNotFound(SessionId),

    /// Caller does not own the session or booking.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Session exists but has not been paid.
    #[error("payment incomplete for session {session_id} (status: {status})")]
    PaymentIncomplete {
        /// The session checked.
        session_id: SessionId,
        /// Status reported by the provider.
        status: PaymentStatus,
    },

    /// A paid session could not be honoured because the listing had no
    /// space left. The payment must be refunded.
    #[error("capacity exceeded on listing {listing_id} for paid session {session_id}")]
    CapacityExceeded {
        /// Listing that was full (or gone).
        listing_id: ListingId,
        /// Paid session that needs a refund.
        session_id: SessionId,
    },

    // =========================================================================
    // Listing Management Errors
    // =========================================================================
    /// Listing not found.
    #[error("listing not found: {0}")]
    ListingNotFound(ListingId),

    /// Listing fields failed validation.
    #[error("invalid listing: {0}")]
    InvalidListing(String),

    /// Caller is not the host of the listing.
    #[error("not the owner of listing {0}")]
    NotListingOwner(ListingId),

    /// Operations configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Storage error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Payment provider error.
    #[error("gateway error: {0}")]
    Gateway(#[from] PayError),
}

impl OpsError {
    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        OpsError::Unauthorized(msg.into())
    }

    /// Create an invalid listing error.
    pub fn invalid_listing(msg: impl Into<String>) -> Self {
        OpsError::InvalidListing(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        OpsError::Config(msg.into())
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ListingUnavailable(_) => ErrorCode::ListingUnavailable,
            Self::SessionNotFound(_) => ErrorCode::SessionNotFound,
            Self::Unauthorized(_) | Self::NotListingOwner(_) => ErrorCode::Unauthorized,
            Self::PaymentIncomplete { .. } => ErrorCode::PaymentIncomplete,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::ListingNotFound(_) => ErrorCode::ListingNotFound,
            Self::InvalidListing(_) => ErrorCode::InvalidListing,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Store(StoreError::ListingNotFound(_)) => ErrorCode::ListingNotFound,
            Self::Store(_) => ErrorCode::StorageError,
            Self::Gateway(PayError::Timeout(_)) => ErrorCode::Timeout,
            Self::Gateway(PayError::Config(_)) => ErrorCode::ConfigError,
            Self::Gateway(_) => ErrorCode::GatewayError,
        }
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ListingUnavailable(_) => {
                "This listing cannot be booked. Choose another listing with remaining spaces."
            }
            Self::SessionNotFound(_) => {
                "The checkout session is unknown or expired. Start a new checkout."
            }
            Self::Unauthorized(_) => {
                "Only the user who started the checkout can confirm or view it."
            }
            Self::PaymentIncomplete { .. } => {
                "Payment has not completed yet. Finish paying, then confirm again."
            }
            Self::CapacityExceeded { .. } => {
                "The listing filled up before this payment was confirmed. The payment must be refunded."
            }
            Self::ListingNotFound(_) => {
                "Listing not found. Use 'parkline listing list' to find listings."
            }
            Self::InvalidListing(_) => {
                "Check price, spaces, spot and event times, then publish again."
            }
            Self::NotListingOwner(_) => "Only the listing's host can change it.",
            Self::Config(_) => "Check the [checkout] section of the configuration file.",
            Self::Store(e) => e.suggestion(),
            Self::Gateway(e) if e.is_retryable() => {
                "The payment provider is unreachable. Retry shortly."
            }
            Self::Gateway(_) => "Check payment provider credentials and configuration.",
        }
    }

    /// Returns true if this error is transient and the operation may succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Gateway(e) => e.is_retryable(),
            Self::PaymentIncomplete { .. } => true, // May resolve once the guest pays
            _ => false,
        }
    }

    /// Suggested retry delay in milliseconds for transient errors.
    ///
    /// Returns `None` for non-transient errors.
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            Self::Store(e) => e.retry_delay_ms(),
            Self::Gateway(e) if e.is_retryable() => Some(
                e.retry_after()
                    .map(|wait| wait.as_millis() as u64)
                    .unwrap_or(2_000),
            ),
            Self::PaymentIncomplete { .. } => Some(5_000),
            _ => None,
        }
    }

    /// Returns true if money was taken that the marketplace cannot honour.
    pub fn requires_refund(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// Metric labels for monitoring integration.
    pub fn metric_labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::ListingUnavailable(_) => ("ops", "listing_unavailable"),
            Self::SessionNotFound(_) => ("ops", "session_not_found"),
            Self::Unauthorized(_) => ("ops", "unauthorized"),
            Self::PaymentIncomplete { .. } => ("ops", "payment_incomplete"),
            Self::CapacityExceeded { .. } => ("ops", "capacity_exceeded"),
            Self::ListingNotFound(_) => ("ops", "listing_not_found"),
            Self::InvalidListing(_) => ("ops", "invalid_listing"),
            Self::NotListingOwner(_) => ("ops", "not_listing_owner"),
            Self::Config(_) => ("ops", "config"),
            Self::Store(_) => ("ops", "store"),
            Self::Gateway(_) => ("ops", "gateway"),
        }
    }
}
