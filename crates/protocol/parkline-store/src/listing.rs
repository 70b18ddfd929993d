//! Listing storage.
//!
//! Listings live in SQLite. The capacity counters are only ever changed
//! by [`reserve_one`], a single conditional `UPDATE` that takes a space
//! when one is free and reports contention as [`ReserveOutcome::AtCapacity`].

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use parkline_types::{
    current_timestamp, Amount, Capacity, EventWindow, Listing, ListingId, ListingStatus, SpotId,
    Timestamp, UserId,
};

use crate::error::{Result, StoreError};
use crate::traits::ListingStore;
use crate::types::{ListingFilter, ReserveOutcome};

const LISTING_COLUMNS: &str = "id, spot_id, host_id, title, event_name, price, spaces_available,
     booked_spaces, status, start_at, end_at, created_at, updated_at";

/// SQLite-based listing store.
pub struct SqliteListingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteListingStore {
    /// Create a new listing store with the given database connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::lock_poisoned("database connection lock poisoned"))
    }
}

impl ListingStore for SqliteListingStore {
    fn insert(&self, listing: &Listing) -> Result<()> {
        let conn = self.lock()?;
        insert_listing(&conn, listing)
    }

    fn get(&self, id: &ListingId) -> Result<Option<Listing>> {
        let conn = self.lock()?;
        load_listing(&conn, id)
    }

    fn capacity(&self, id: &ListingId) -> Result<Option<Capacity>> {
        let conn = self.lock()?;
        read_capacity(&conn, id)
    }

    fn try_reserve_one(&self, id: &ListingId) -> Result<ReserveOutcome> {
        let conn = self.lock()?;
        reserve_one(&conn, id, current_timestamp())
    }

    fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        let conn = self.lock()?;

        let mut sql = format!("SELECT {} FROM listings WHERE 1=1", LISTING_COLUMNS);
        let mut params_values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(spot_id) = &filter.spot_id {
            params_values.push(Box::new(spot_id.as_str().to_string()));
            sql.push_str(&format!(" AND spot_id = ?{}", params_values.len()));
        }

        if let Some(host_id) = &filter.host_id {
            params_values.push(Box::new(host_id.as_str().to_string()));
            sql.push_str(&format!(" AND host_id = ?{}", params_values.len()));
        }

        if let Some(status) = filter.status {
            params_values.push(Box::new(status.as_str()));
            sql.push_str(&format!(" AND status = ?{}", params_values.len()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        // SQLite requires a LIMIT before OFFSET
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let listings = stmt
            .query_map(params_refs.as_slice(), deserialize_listing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(listings)
    }

    fn update_price(&self, id: &ListingId, price: Amount, now: Timestamp) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE listings SET price = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.as_str(), price as i64, now as i64],
        )?;

        if updated == 0 {
            return Err(StoreError::ListingNotFound(id.clone()));
        }
        Ok(())
    }

    fn deactivate(&self, id: &ListingId, now: Timestamp) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE listings SET status = 'inactive', updated_at = ?2 WHERE id = ?1",
            params![id.as_str(), now as i64],
        )?;

        if updated == 0 {
            return Err(StoreError::ListingNotFound(id.clone()));
        }
        Ok(())
    }
}

/// Insert a listing row.
pub(crate) fn insert_listing(conn: &Connection, listing: &Listing) -> Result<()> {
    if listing.booked_spaces > listing.spaces_available {
        return Err(StoreError::invalid_data(format!(
            "listing {} has {} booked of {} spaces",
            listing.id, listing.booked_spaces, listing.spaces_available
        )));
    }

    conn.execute(
        "INSERT INTO listings (id, spot_id, host_id, title, event_name, price, spaces_available,
                               booked_spaces, status, start_at, end_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            listing.id.as_str(),
            listing.spot_id.as_str(),
            listing.host_id.as_str(),
            listing.title,
            listing.event_name,
            listing.price as i64,
            listing.spaces_available,
            listing.booked_spaces,
            listing.status.as_str(),
            listing.window.start as i64,
            listing.window.end as i64,
            listing.created_at as i64,
            listing.updated_at as i64,
        ],
    )?;

    Ok(())
}

/// Load a listing row.
pub(crate) fn load_listing(conn: &Connection, id: &ListingId) -> Result<Option<Listing>> {
    let listing = conn
        .query_row(
            &format!("SELECT {} FROM listings WHERE id = ?1", LISTING_COLUMNS),
            [id.as_str()],
            deserialize_listing,
        )
        .optional()?;
    Ok(listing)
}

/// Read the capacity counters of a listing.
pub(crate) fn read_capacity(conn: &Connection, id: &ListingId) -> Result<Option<Capacity>> {
    let capacity = conn
        .query_row(
            "SELECT spaces_available, booked_spaces, status FROM listings WHERE id = ?1",
            [id.as_str()],
            deserialize_capacity,
        )
        .optional()?;
    Ok(capacity)
}

/// Take one space on a listing if one is free.
///
/// The guard `booked_spaces < spaces_available` and the increment are one
/// statement, so concurrent callers on any connection cannot both take
/// the last space. `SET` expressions see the pre-update row, so the
/// `CASE` marks an active listing full exactly when this increment fills it.
pub(crate) fn reserve_one(
    conn: &Connection,
    id: &ListingId,
    now: Timestamp,
) -> Result<ReserveOutcome> {
    let reserved = conn
        .query_row(
            "UPDATE listings
             SET booked_spaces = booked_spaces + 1,
                 status = CASE
                     WHEN status = 'active' AND booked_spaces + 1 >= spaces_available THEN 'full'
                     ELSE status
                 END,
                 updated_at = ?2
             WHERE id = ?1 AND booked_spaces < spaces_available
             RETURNING spaces_available, booked_spaces, status",
            params![id.as_str(), now as i64],
            deserialize_capacity,
        )
        .optional()?;

    match reserved {
        Some(capacity) => Ok(ReserveOutcome::Reserved(capacity)),
        None => match read_capacity(conn, id)? {
            Some(_) => Ok(ReserveOutcome::AtCapacity),
            None => Ok(ReserveOutcome::NotFound),
        },
    }
}

fn parse_status(idx: usize, raw: String) -> rusqlite::Result<ListingStatus> {
    ListingStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(StoreError::invalid_data(format!(
                "unknown listing status '{}'",
                raw
            ))),
        )
    })
}

fn deserialize_capacity(row: &rusqlite::Row) -> rusqlite::Result<Capacity> {
    let spaces_available: u32 = row.get(0)?;
    let booked_spaces: u32 = row.get(1)?;
    let status = parse_status(2, row.get(2)?)?;
    Ok(Capacity::new(spaces_available, booked_spaces, status))
}

fn deserialize_listing(row: &rusqlite::Row) -> rusqlite::Result<Listing> {
    let price: i64 = row.get(5)?;
    let start: i64 = row.get(9)?;
    let end: i64 = row.get(10)?;
    let created_at: i64 = row.get(11)?;
    let updated_at: i64 = row.get(12)?;

    Ok(Listing {
        id: ListingId::new(row.get::<_, String>(0)?),
        spot_id: SpotId::new(row.get::<_, String>(1)?),
        host_id: UserId::new(row.get::<_, String>(2)?),
        title: row.get(3)?,
        event_name: row.get(4)?,
        price: price as Amount,
        spaces_available: row.get(6)?,
        booked_spaces: row.get(7)?,
        status: parse_status(8, row.get(8)?)?,
        window: EventWindow::new(start as Timestamp, end as Timestamp),
        created_at: created_at as Timestamp,
        updated_at: updated_at as Timestamp,
    })
}
