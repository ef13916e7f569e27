//! Row conversion for `SQLite` entry storage.

use crate::models::{Entry, EntryId, EntryStatus, FeedId, UserId};
use chrono::{DateTime, Utc};
use rusqlite::Row;

/// Column list matching [`EntryRow::from_row`].
pub const ENTRY_COLUMNS: &str =
    "e.id, e.user_id, e.feed_id, e.title, e.url, e.published_at, e.created_at, e.status";

/// Internal representation of an entry row, with primitive column types.
#[derive(Debug)]
pub struct EntryRow {
    /// Entry ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Feed ID.
    pub feed_id: i64,
    /// Title.
    pub title: String,
    /// URL.
    pub url: String,
    /// Publication time, Unix seconds.
    pub published_at: i64,
    /// Storage time, Unix seconds.
    pub created_at: i64,
    /// Status string.
    pub status: String,
}

impl EntryRow {
    /// Reads a row selected with [`ENTRY_COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns the `rusqlite` error if a column is missing or mistyped.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            feed_id: row.get(2)?,
            title: row.get(3)?,
            url: row.get(4)?,
            published_at: row.get(5)?,
            created_at: row.get(6)?,
            status: row.get(7)?,
        })
    }
}

/// Converts an `EntryRow` to an [`Entry`].
///
/// Out-of-range timestamps map to the Unix epoch and unknown statuses to
/// `unread`; the store only ever writes valid values.
#[must_use]
pub fn build_entry_from_row(row: EntryRow) -> Entry {
    Entry {
        id: EntryId::new(row.id),
        user_id: UserId::new(row.user_id),
        feed_id: FeedId::new(row.feed_id),
        title: row.title,
        url: row.url,
        published_at: timestamp_to_datetime(row.published_at),
        created_at: timestamp_to_datetime(row.created_at),
        status: EntryStatus::parse(&row.status).unwrap_or_default(),
    }
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
