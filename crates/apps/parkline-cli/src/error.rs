//! CLI error types.

use parkline_pay::PayError;
use parkline_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed command-line input (prices, times).
    #[error("{0}")]
    Input(#[from] parkline_types::ParklineError),

    /// Operations error.
    #[error("{0}")]
    Ops(#[from] parkline_ops::OpsError),

    /// Store error.
    #[error("{0}")]
    Store(#[from] parkline_store::StoreError),

    /// Payment provider error.
    #[error("{0}")]
    Payment(#[from] PayError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration file already present.
    #[error("Already initialized: {}. Use --force to overwrite.", .0.display())]
    AlreadyInitialized(PathBuf),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) | Self::Input(_) | Self::AlreadyInitialized(_) => 1,
            // Not found: 2
            Self::NotFound(_) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // Payment provider errors: 4
            Self::Payment(_) => 4,
            // Paid session that must be refunded: 5
            Self::Ops(e) if e.requires_refund() => 5,
            // Store errors: 6
            Self::Store(_) => 6,
            // Operations errors: 8
            Self::Ops(_) => 8,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// Get the stable error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ListingNotFound,
            Self::Config(_) | Self::Toml(_) | Self::AlreadyInitialized(_) => ErrorCode::ConfigError,

            // Delegated errors
            Self::Input(e) => e.error_code(),
            Self::Ops(e) => e.error_code(),
            Self::Store(_) => ErrorCode::StorageError,
            Self::Payment(PayError::Timeout(_)) => ErrorCode::Timeout,
            Self::Payment(PayError::Config(_)) => ErrorCode::ConfigError,
            Self::Payment(PayError::SessionNotFound(_)) => ErrorCode::SessionNotFound,
            Self::Payment(_) => ErrorCode::GatewayError,

            Self::Io(_) | Self::Json(_) | Self::User(_) => ErrorCode::InternalError,
        }
    }

    /// Recovery hint shown under the error line.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Ops(e) => e.suggestion(),
            Self::Store(e) => e.suggestion(),
            _ => self.error_code().suggestion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkline_ops::OpsError;
    use parkline_types::{ListingId, ParklineError, SessionId};

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::user("bad").exit_code(), 1);
        assert_eq!(CliError::config("bad").exit_code(), 3);
        assert_eq!(CliError::NotFound("x".into()).exit_code(), 2);

        let refund = CliError::from(OpsError::CapacityExceeded {
            listing_id: ListingId::new("lst_1"),
            session_id: SessionId::new("cs_1"),
        });
        assert_eq!(refund.exit_code(), 5);

        let unavailable = CliError::from(OpsError::ListingUnavailable(ListingId::new("lst_1")));
        assert_eq!(unavailable.exit_code(), 8);
    }

    #[test]
    fn test_error_codes_delegate() {
        let err = CliError::from(OpsError::SessionNotFound(SessionId::new("cs_1")));
        assert_eq!(err.error_code(), ErrorCode::SessionNotFound);

        let err = CliError::from(ParklineError::InvalidInput("price".into()));
        assert_eq!(err.error_code(), ErrorCode::InvalidListing);

        let err = CliError::from(PayError::timeout("slow"));
        assert_eq!(err.error_code(), ErrorCode::Timeout);
    }
}
