//! Booking ledger storage.
//!
//! Bookings are keyed uniquely by checkout session. Writes go through
//! `INSERT OR IGNORE` so a replayed confirmation returns the stored row
//! instead of creating a second one.

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use parkline_types::{
    Amount, Booking, BookingId, BookingStatus, EventWindow, ListingId, SessionId, SpotId,
    Timestamp, UserId,
};

use crate::error::{Result, StoreError};
use crate::traits::BookingLedger;
use crate::types::LedgerWrite;

const BOOKING_COLUMNS: &str = "b.id, b.session_id, b.user_id, b.listing_id, b.spot_id,
     b.total_price, b.status, b.start_at, b.end_at, b.created_at";

/// SQLite-based booking ledger.
pub struct SqliteBookingLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBookingLedger {
    /// Create a new ledger with the given database connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))
    }

    fn query_many(&self, sql: &str, key: &str) -> Result<Vec<Booking>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let bookings = stmt
            .query_map([key], deserialize_booking)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bookings)
    }
}

impl BookingLedger for SqliteBookingLedger {
    fn create_if_absent(&self, booking: &Booking) -> Result<LedgerWrite> {
        let conn = self.lock()?;

        let inserted = insert_booking_or_ignore(&conn, booking)?;
        let stored = booking_by_session(&conn, &booking.session_id)?.ok_or_else(|| {
            StoreError::invalid_data(format!(
                "booking for session {} vanished after insert",
                booking.session_id
            ))
        })?;

        if inserted {
            Ok(LedgerWrite::Created(stored))
        } else {
            tracing::debug!(
                session_id = %booking.session_id,
                booking_id = %stored.id,
                "Booking already recorded for session"
            );
            Ok(LedgerWrite::Existing(stored))
        }
    }

    fn get(&self, id: &BookingId) -> Result<Option<Booking>> {
        let conn = self.lock()?;
        let booking = conn
            .query_row(
                &format!("SELECT {} FROM bookings b WHERE b.id = ?1", BOOKING_COLUMNS),
                [id.as_str()],
                deserialize_booking,
            )
            .optional()?;
        Ok(booking)
    }

    fn get_by_session(&self, session_id: &SessionId) -> Result<Option<Booking>> {
        let conn = self.lock()?;
        booking_by_session(&conn, session_id)
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        self.query_many(
            &format!(
                "SELECT {} FROM bookings b WHERE b.user_id = ?1
                 ORDER BY b.created_at DESC, b.id ASC",
                BOOKING_COLUMNS
            ),
            user_id.as_str(),
        )
    }

    fn list_for_listing(&self, listing_id: &ListingId) -> Result<Vec<Booking>> {
        self.query_many(
            &format!(
                "SELECT {} FROM bookings b WHERE b.listing_id = ?1
                 ORDER BY b.created_at DESC, b.id ASC",
                BOOKING_COLUMNS
            ),
            listing_id.as_str(),
        )
    }

    fn list_for_host(&self, host_id: &UserId) -> Result<Vec<Booking>> {
        self.query_many(
            &format!(
                "SELECT {} FROM bookings b
                 JOIN listings l ON l.id = b.listing_id
                 WHERE l.host_id = ?1
                 ORDER BY b.created_at DESC, b.id ASC",
                BOOKING_COLUMNS
            ),
            host_id.as_str(),
        )
    }
}

/// Insert a booking row unless its session already has one.
///
/// Returns true if a row was inserted.
pub(crate) fn insert_booking_or_ignore(conn: &Connection, booking: &Booking) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO bookings (id, session_id, user_id, listing_id, spot_id,
                                         total_price, status, start_at, end_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id.as_str(),
            booking.session_id.as_str(),
            booking.user_id.as_str(),
            booking.listing_id.as_str(),
            booking.spot_id.as_str(),
            booking.total_price as i64,
            booking.status.as_str(),
            booking.window.start as i64,
            booking.window.end as i64,
            booking.created_at as i64,
        ],
    )?;
    Ok(inserted == 1)
}

/// Load the booking for a checkout session.
pub(crate) fn booking_by_session(
    conn: &Connection,
    session_id: &SessionId,
) -> Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!(
                "SELECT {} FROM bookings b WHERE b.session_id = ?1",
                BOOKING_COLUMNS
            ),
            [session_id.as_str()],
            deserialize_booking,
        )
        .optional()?;
    Ok(booking)
}

fn deserialize_booking(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let total_price: i64 = row.get(5)?;
    let raw_status: String = row.get(6)?;
    let start: i64 = row.get(7)?;
    let end: i64 = row.get(8)?;
    let created_at: i64 = row.get(9)?;

    let status = BookingStatus::parse(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            Box::new(StoreError::invalid_data(format!(
                "unknown booking status '{}'",
                raw_status
            ))),
        )
    })?;

    Ok(Booking {
        id: BookingId::new(row.get::<_, String>(0)?),
        session_id: SessionId::new(row.get::<_, String>(1)?),
        user_id: UserId::new(row.get::<_, String>(2)?),
        listing_id: ListingId::new(row.get::<_, String>(3)?),
        spot_id: SpotId::new(row.get::<_, String>(4)?),
        total_price: total_price as Amount,
        status,
        window: EventWindow::new(start as Timestamp, end as Timestamp),
        created_at: created_at as Timestamp,
    })
}
