//! SQLite storage for the Parkline marketplace.
//!
//! This crate persists the two pieces of state the marketplace owns:
//!
//! - **Listings** (SQLite): capacity counters with an atomic, bounded increment
//! - **Bookings** (SQLite): an append-only ledger, unique per checkout session
//!
//! # Storage Layout
//!
//! ```text
//! ~/.parkline/
//! ├── config.toml              # CLI configuration
//! └── parkline.db              # SQLite: listings, bookings
//! ```
//!
//! # Example
//!
//! ```no_run
//! use parkline_store::{ListingStore, MarketState, MarketStateConfig, ReserveOutcome};
//! use parkline_types::{EventWindow, Listing, SpotId, UserId};
//!
//! let state = MarketState::open(MarketStateConfig::new("/tmp/parkline")).unwrap();
//!
//! let listing = Listing::new(
//!     SpotId::new("spot_1"),
//!     UserId::new("host_1"),
//!     "Lot C",
//!     1200,
//!     1,
//!     EventWindow::new(1_000, 2_000),
//!     0,
//! );
//! state.listings.insert(&listing).unwrap();
//!
//! assert!(state.listings.try_reserve_one(&listing.id).unwrap().is_reserved());
//! assert_eq!(
//!     state.listings.try_reserve_one(&listing.id).unwrap(),
//!     ReserveOutcome::AtCapacity
//! );
//! ```
//!
//! # Concurrency
//!
//! Each [`MarketState`] owns one connection behind a mutex. Several
//! states (or processes) may open the same database file; SQLite's write
//! lock plus the configured busy timeout serialize their writes.

pub mod booking;
pub mod error;
pub mod listing;
pub mod schema;
pub mod traits;
pub mod types;

pub use error::{Result, StoreError};
pub use traits::{BookingLedger, ListingStore};
pub use types::{CommitOutcome, LedgerWrite, ListingFilter, ReserveOutcome};

pub use booking::SqliteBookingLedger;
pub use listing::SqliteListingStore;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use parkline_types::Booking;
use rusqlite::{Connection, TransactionBehavior};

/// Default time a connection waits on another writer before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Get the default data directory for Parkline state.
///
/// Priority:
/// 1. `PARKLINE_DATA_DIR` environment variable (if set)
/// 2. Platform-specific data directory (e.g., `~/.local/share/parkline` on Linux)
/// 3. Fallback to `$HOME/.parkline`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARKLINE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("io", "parkline", "parkline")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".parkline")
        })
}

/// Configuration for MarketState.
#[derive(Debug, Clone)]
pub struct MarketStateConfig {
    /// Base directory for all marketplace data.
    pub base_dir: PathBuf,
    /// Database file path (default: base_dir/parkline.db).
    pub database_path: Option<PathBuf>,
    /// How long to wait on a locked database.
    pub busy_timeout: Duration,
}

impl MarketStateConfig {
    /// Create a new configuration with the given base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            database_path: None,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Set the database path.
    pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Get the database path.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join("parkline.db"))
    }
}

impl Default for MarketStateConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

/// Marketplace state: the listing store and booking ledger over one
/// shared connection.
pub struct MarketState {
    /// Listing capacity store (SQLite).
    pub listings: SqliteListingStore,
    /// Booking ledger (SQLite).
    pub bookings: SqliteBookingLedger,
    /// Shared database connection.
    conn: Arc<Mutex<Connection>>,
    /// Configuration used to open this state.
    config: MarketStateConfig,
}

impl MarketState {
    /// Open marketplace state with the given configuration.
    ///
    /// Creates the base directory and initializes the database schema.
    pub fn open(config: MarketStateConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.base_dir)?;

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(db_path = %db_path.display(), "Opening marketplace database");
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(config.busy_timeout)?;
        schema::initialize_schema(&conn)?;

        Ok(Self::from_connection(conn, config))
    }

    /// Open marketplace state backed by an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;
        let config = MarketStateConfig::new(std::env::temp_dir());
        Ok(Self::from_connection(conn, config))
    }

    fn from_connection(conn: Connection, config: MarketStateConfig) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self {
            listings: SqliteListingStore::new(Arc::clone(&conn)),
            bookings: SqliteBookingLedger::new(Arc::clone(&conn)),
            conn,
            config,
        }
    }

    /// Get the configuration used to open this state.
    pub fn config(&self) -> &MarketStateConfig {
        &self.config
    }

    /// Get a reference to the shared database connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Take one space on the booking's listing and record the booking.
    ///
    /// Runs in one `IMMEDIATE` transaction: the ledger is re-checked for
    /// the session, the capacity increment is attempted, and the booking is
    /// inserted only if a space was taken. Nothing is written unless all
    /// three steps succeed.
    pub fn commit_booking(&self, booking: &Booking) -> Result<CommitOutcome> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = booking::booking_by_session(&tx, &booking.session_id)? {
            return Ok(CommitOutcome::Existing(existing));
        }

        let capacity = match listing::reserve_one(&tx, &booking.listing_id, booking.created_at)? {
            ReserveOutcome::Reserved(capacity) => capacity,
            ReserveOutcome::AtCapacity => return Ok(CommitOutcome::CapacityExceeded),
            ReserveOutcome::NotFound => return Ok(CommitOutcome::ListingMissing),
        };

        if !booking::insert_booking_or_ignore(&tx, booking)? {
            return Err(StoreError::invalid_data(format!(
                "booking for session {} appeared inside a write transaction",
                booking.session_id
            )));
        }
        tx.commit()?;

        tracing::debug!(
            booking_id = %booking.id,
            listing_id = %booking.listing_id,
            booked = capacity.booked_spaces,
            total = capacity.spaces_available,
            "Booking committed"
        );

        Ok(CommitOutcome::Created {
            booking: booking.clone(),
            capacity,
        })
    }
}
