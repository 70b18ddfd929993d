//! SQL schema initialization.
//!
//! This module defines the database schema for SQLite storage.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Schema version for migration tracking.
pub const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist.
/// This function is idempotent - calling it multiple times is safe.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // WAL lets readers proceed while a booking transaction holds the write lock
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    match current_version {
        None => {
            create_tables(conn)?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
        Some(version) if version > SCHEMA_VERSION => {
            return Err(StoreError::schema(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        Some(_) => {}
    }

    Ok(())
}

/// Create all database tables.
fn create_tables(conn: &Connection) -> Result<()> {
    // Listings: the capacity pair is guarded by a CHECK so no statement
    // can leave booked_spaces above spaces_available.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS listings (
            id TEXT PRIMARY KEY,
            spot_id TEXT NOT NULL,
            host_id TEXT NOT NULL,
            title TEXT NOT NULL,
            event_name TEXT NOT NULL DEFAULT '',
            price INTEGER NOT NULL CHECK (price >= 0),
            spaces_available INTEGER NOT NULL CHECK (spaces_available >= 0),
            booked_spaces INTEGER NOT NULL DEFAULT 0
                CHECK (booked_spaces >= 0 AND booked_spaces <= spaces_available),
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'full', 'inactive')),
            start_at INTEGER NOT NULL,
            end_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_listings_spot ON listings(spot_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_listings_host ON listings(host_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_listings_status ON listings(status)",
        [],
    )?;

    // Bookings: one row per checkout session
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL,
            listing_id TEXT NOT NULL REFERENCES listings(id),
            spot_id TEXT NOT NULL,
            total_price INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'paid'
                CHECK (status IN ('paid', 'cancelled')),
            start_at INTEGER NOT NULL,
            end_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookings_listing ON bookings(listing_id)",
        [],
    )?;

    Ok(())
}
