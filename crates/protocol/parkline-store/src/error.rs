//! Error types for the storage layer.
//!
//! This module defines the error types used throughout the parkline-store crate.

use parkline_types::ListingId;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Listing not found in store.
    #[error("Listing not found: {0}")]
    ListingNotFound(ListingId),

    /// Schema initialization error.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid data format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Lock poisoning error.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        StoreError::Schema(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        StoreError::InvalidData(msg.into())
    }

    /// Create a lock poisoned error.
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        StoreError::LockPoisoned(msg.into())
    }

    /// Returns true if the operation may succeed when retried.
    ///
    /// SQLite reports `SQLITE_BUSY` / `SQLITE_LOCKED` when another
    /// connection holds the write lock past the busy timeout.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Suggested retry delay in milliseconds for transient errors.
    pub fn retry_delay_ms(&self) -> Option<u64> {
        if self.is_transient() {
            Some(250)
        } else {
            None
        }
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io(_) => "Check that the data directory exists and is writable.",
            Self::Database(_) if self.is_transient() => {
                "The database is busy. Retry the operation."
            }
            Self::Database(_) => "Database error. Check the database file is not corrupted.",
            Self::ListingNotFound(_) => "Listing not found. Use 'parkline listing list' to find it.",
            Self::Schema(_) => "Database schema mismatch. Upgrade parkline or use a fresh data directory.",
            Self::InvalidData(_) => "Stored data is inconsistent. Inspect the database.",
            Self::LockPoisoned(_) => "Internal lock failure. Restart the process.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::ListingNotFound(ListingId::new("lst_missing"));
        let msg = err.to_string();
        assert!(msg.contains("Listing not found"));
        assert!(msg.contains("lst_missing"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }

    #[test]
    fn test_busy_is_transient() {
        let err = StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert!(err.is_transient());
        assert_eq!(err.retry_delay_ms(), Some(250));
        assert!(!StoreError::schema("bad").is_transient());
        assert!(StoreError::schema("bad").retry_delay_ms().is_none());
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            StoreError::invalid_data("x"),
            StoreError::InvalidData(_)
        ));
        assert!(matches!(
            StoreError::lock_poisoned("x"),
            StoreError::LockPoisoned(_)
        ));
    }
}
