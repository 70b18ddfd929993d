//! Error types shared across Parkline crates.
//!
//! [`ErrorCode`] is the stable, machine-readable code surfaced to callers
//! (CLI JSON output, exit codes). [`ParklineError`] is the coarse error type
//! for code that does not need a crate-specific enum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Checkout / confirmation (0x0001 - 0x00FF)
    // =========================================================================
    /// Listing missing, inactive or full
    ListingUnavailable = 0x0001,
    /// Checkout session unknown or expired
    SessionNotFound = 0x0002,
    /// Caller does not own the session, booking or listing
    Unauthorized = 0x0003,
    /// Session has not been paid
    PaymentIncomplete = 0x0004,
    /// Paid session could not be honoured because the listing filled up
    CapacityExceeded = 0x0005,

    // =========================================================================
    // Listing management (0x0100 - 0x01FF)
    // =========================================================================
    /// Listing not found
    ListingNotFound = 0x0100,
    /// Listing fields failed validation
    InvalidListing = 0x0101,

    // =========================================================================
    // Infrastructure (0x0200 - 0x02FF)
    // =========================================================================
    /// Storage failure
    StorageError = 0x0200,
    /// Payment provider failure
    GatewayError = 0x0201,
    /// Configuration problem
    ConfigError = 0x0202,
    /// Operation timed out
    Timeout = 0x0203,
    /// Unexpected internal error
    InternalError = 0x02FF,
}

impl ErrorCode {
    /// Short remediation hint for the code.
    pub fn suggestion(&self) -> &'static str {
        match self {
            ErrorCode::ListingUnavailable => "Choose another listing with remaining spaces",
            ErrorCode::SessionNotFound => "Start a new checkout session",
            ErrorCode::Unauthorized => "Sign in as the user who started the checkout",
            ErrorCode::PaymentIncomplete => "Complete payment, then confirm again",
            ErrorCode::CapacityExceeded => "The payment must be refunded; contact support",
            ErrorCode::ListingNotFound => "Check the listing id with 'parkline listing list'",
            ErrorCode::InvalidListing => "Fix the listing fields and publish again",
            ErrorCode::StorageError => "Check the data directory and retry",
            ErrorCode::GatewayError => "Check payment provider credentials and connectivity",
            ErrorCode::ConfigError => "Check the configuration file",
            ErrorCode::Timeout => "Retry the operation",
            ErrorCode::InternalError => "Report this issue",
        }
    }

    /// Numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ListingUnavailable => write!(f, "LISTING_UNAVAILABLE"),
            ErrorCode::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::PaymentIncomplete => write!(f, "PAYMENT_INCOMPLETE"),
            ErrorCode::CapacityExceeded => write!(f, "CAPACITY_EXCEEDED"),
            ErrorCode::ListingNotFound => write!(f, "LISTING_NOT_FOUND"),
            ErrorCode::InvalidListing => write!(f, "INVALID_LISTING"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::GatewayError => write!(f, "GATEWAY_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Coarse error type for Parkline operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParklineError {
    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Error with an explicit code
    #[error("{code}: {message}")]
    Coded {
        /// The error code
        code: ErrorCode,
        /// Human-readable message
        message: String,
    },
}

impl ParklineError {
    /// Create an error carrying an explicit code.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
        }
    }

    /// Error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ParklineError::InvalidInput(_) => ErrorCode::InvalidListing,
            ParklineError::NotFound(_) => ErrorCode::ListingNotFound,
            ParklineError::Coded { code, .. } => *code,
        }
    }
}

/// Result type alias using [`ParklineError`].
pub type Result<T> = std::result::Result<T, ParklineError>;
