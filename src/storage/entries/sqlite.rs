//! `SQLite` entry store.
//!
//! Stores users, feeds and entries in a single database file. Timestamps are
//! Unix seconds, so range filters compare integers.

use crate::models::{
    Entry, EntryId, EntryQuery, EntryStatus, FeedId, SortColumn, SortDirection, TimeRange, User,
    UserId,
};
use crate::storage::sqlite::{
    ENTRY_COLUMNS, EntryRow, GLOBALLY_VISIBLE_CONDITION, acquire_lock, build_entry_from_row,
    build_filter_clause, build_mark_read_clause, build_order_clause, configure_connection,
    record_operation_metrics, status_label,
};
use crate::storage::traits::{EntryStore, UserDirectory};
use crate::{Error, Result};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const BACKEND: &str = "sqlite";

/// An entry to insert through [`SqliteEntryStore::insert_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Owning user.
    pub user_id: UserId,
    /// Feed the entry belongs to; must be owned by `user_id`.
    pub feed_id: FeedId,
    /// Entry title.
    pub title: String,
    /// Link to the article.
    pub url: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// Initial status.
    pub status: EntryStatus,
}

impl NewEntry {
    /// Creates an unread entry with an empty URL.
    #[must_use]
    pub fn new(
        user_id: UserId,
        feed_id: FeedId,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            feed_id,
            title: title.into(),
            url: String::new(),
            published_at,
            status: EntryStatus::Unread,
        }
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }
}

/// SQLite-backed entry store and user directory.
pub struct SqliteEntryStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the `SQLite` database (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteEntryStore {
    /// Opens (or creates) a file-backed store.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_database_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::OperationFailed {
            operation: "open_sqlite".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };

        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_sqlite_memory".to_string(),
            cause: e.to_string(),
        })?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };

        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Initializes the database schema.
    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timezone TEXT NOT NULL DEFAULT 'UTC',
                entry_order TEXT NOT NULL DEFAULT 'published_at',
                entry_direction TEXT NOT NULL DEFAULT 'asc'
            );
            CREATE TABLE IF NOT EXISTS feeds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                hide_globally INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                feed_id INTEGER NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                url TEXT NOT NULL DEFAULT '',
                published_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'unread'
                    CHECK (status IN ('unread', 'read', 'removed'))
            );",
        )
        .map_err(|e| Error::OperationFailed {
            operation: "create_schema".to_string(),
            cause: e.to_string(),
        })?;

        Self::create_indexes(&conn);
        Ok(())
    }

    /// Creates indexes for the bucket queries.
    fn create_indexes(conn: &Connection) {
        // Count and mark-read queries filter on user and status first
        let _ = conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_user_status ON entries(user_id, status)",
            [],
        );
        let _ = conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_published_at ON entries(published_at)",
            [],
        );
        let _ = conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_feeds_user ON feeds(user_id, hide_globally)",
            [],
        );
    }

    /// Creates a user with the given timezone and sort preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self), fields(operation = "create_user", backend = "sqlite"))]
    pub fn create_user(
        &self,
        timezone: &str,
        order: SortColumn,
        direction: SortDirection,
    ) -> Result<User> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            conn.execute(
                "INSERT INTO users (timezone, entry_order, entry_direction) VALUES (?1, ?2, ?3)",
                params![timezone, order.as_str(), direction.as_str()],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "create_user".to_string(),
                cause: e.to_string(),
            })?;
            let id = UserId::new(conn.last_insert_rowid());
            Ok(User::new(id, timezone).with_sorting(order, direction))
        })();

        record_operation_metrics(BACKEND, "create_user", start, status_label(&result));
        result
    }

    /// Creates a feed owned by `user_id`.
    ///
    /// Feeds with `hide_globally` set are excluded from every bucket count,
    /// fetch and mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    #[instrument(skip(self, title), fields(operation = "create_feed", backend = "sqlite", user.id = %user_id))]
    pub fn create_feed(&self, user_id: UserId, title: &str, hide_globally: bool) -> Result<FeedId> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            conn.execute(
                "INSERT INTO feeds (user_id, title, hide_globally) VALUES (?1, ?2, ?3)",
                params![user_id.get(), title, hide_globally],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "create_feed".to_string(),
                cause: e.to_string(),
            })?;
            Ok(FeedId::new(conn.last_insert_rowid()))
        })();

        record_operation_metrics(BACKEND, "create_feed", start, status_label(&result));
        result
    }

    /// Inserts an entry.
    ///
    /// The publication timestamp is stored with second precision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the feed does not belong to the
    /// entry's user, or an error if the insert fails.
    #[instrument(
        skip(self, entry),
        fields(operation = "insert_entry", backend = "sqlite", user.id = %entry.user_id, feed.id = %entry.feed_id)
    )]
    pub fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);

            let owner: Option<i64> = conn
                .query_row(
                    "SELECT user_id FROM feeds WHERE id = ?1",
                    params![entry.feed_id.get()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "lookup_feed".to_string(),
                    cause: e.to_string(),
                })?;
            if owner != Some(entry.user_id.get()) {
                return Err(Error::InvalidInput(format!(
                    "feed {} does not belong to user {}",
                    entry.feed_id, entry.user_id
                )));
            }

            let created_at = Utc::now().trunc_subsecs(0);
            conn.execute(
                "INSERT INTO entries (user_id, feed_id, title, url, published_at, created_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.user_id.get(),
                    entry.feed_id.get(),
                    entry.title,
                    entry.url,
                    entry.published_at.timestamp(),
                    created_at.timestamp(),
                    entry.status.as_str()
                ],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "insert_entry".to_string(),
                cause: e.to_string(),
            })?;
            Ok(EntryId::new(conn.last_insert_rowid()))
        })();

        record_operation_metrics(BACKEND, "insert_entry", start, status_label(&result));
        result
    }

    /// Returns the status of an entry, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    #[instrument(skip(self), fields(operation = "entry_status", backend = "sqlite", entry.id = %id))]
    pub fn entry_status(&self, id: EntryId) -> Result<Option<EntryStatus>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let status: Option<String> = conn
                .query_row(
                    "SELECT status FROM entries WHERE id = ?1",
                    params![id.get()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "entry_status".to_string(),
                    cause: e.to_string(),
                })?;
            Ok(status.and_then(|s| EntryStatus::parse(&s)))
        })();

        record_operation_metrics(BACKEND, "entry_status", start, status_label(&result));
        result
    }
}

impl EntryStore for SqliteEntryStore {
    #[instrument(
        skip(self, query),
        fields(operation = "count_entries", backend = "sqlite", user.id = %query.user_id, range = %query.range)
    )]
    fn count_entries(&self, query: &EntryQuery) -> Result<u64> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let clause = build_filter_clause(query);
            let sql = format!("SELECT COUNT(*) FROM entries e WHERE {}", clause.sql);

            let count: i64 = conn
                .query_row(&sql, params_from_iter(clause.params.iter()), |row| row.get(0))
                .map_err(|e| Error::OperationFailed {
                    operation: "count_entries".to_string(),
                    cause: e.to_string(),
                })?;
            Ok(u64::try_from(count).unwrap_or(0))
        })();

        record_operation_metrics(BACKEND, "count_entries", start, status_label(&result));
        result
    }

    #[instrument(
        skip(self, query),
        fields(operation = "fetch_entries", backend = "sqlite", user.id = %query.user_id, range = %query.range)
    )]
    fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let clause = build_filter_clause(query);
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM entries e WHERE {}{}",
                clause.sql,
                build_order_clause(&query.sorting)
            );

            let mut stmt = conn.prepare(&sql).map_err(|e| Error::OperationFailed {
                operation: "prepare_fetch_entries".to_string(),
                cause: e.to_string(),
            })?;
            let rows = stmt
                .query_map(params_from_iter(clause.params.iter()), EntryRow::from_row)
                .map_err(|e| Error::OperationFailed {
                    operation: "fetch_entries".to_string(),
                    cause: e.to_string(),
                })?;

            let mut entries = Vec::new();
            for row in rows {
                let row = row.map_err(|e| Error::OperationFailed {
                    operation: "read_entry_row".to_string(),
                    cause: e.to_string(),
                })?;
                entries.push(build_entry_from_row(row));
            }
            Ok(entries)
        })();

        record_operation_metrics(BACKEND, "fetch_entries", start, status_label(&result));
        result
    }

    #[instrument(
        skip(self, range),
        fields(operation = "mark_entries_read_in_range", backend = "sqlite", user.id = %user_id, range = %range)
    )]
    fn mark_entries_read_in_range(&self, user_id: UserId, range: &TimeRange) -> Result<u64> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let clause = build_mark_read_clause(user_id, range);
            let sql = format!(
                "UPDATE entries SET status = 'read'
                 WHERE id IN (SELECT e.id FROM entries e WHERE {})",
                clause.sql
            );

            let changed = conn
                .execute(&sql, params_from_iter(clause.params.iter()))
                .map_err(|e| Error::OperationFailed {
                    operation: "mark_entries_read_in_range".to_string(),
                    cause: e.to_string(),
                })?;
            Ok(changed as u64)
        })();

        record_operation_metrics(
            BACKEND,
            "mark_entries_read_in_range",
            start,
            status_label(&result),
        );
        result
    }

    #[instrument(
        skip(self),
        fields(operation = "mark_globally_visible_feeds_read", backend = "sqlite", user.id = %user_id)
    )]
    fn mark_globally_visible_feeds_read(&self, user_id: UserId) -> Result<u64> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let sql = format!(
                "UPDATE entries SET status = 'read'
                 WHERE id IN (SELECT e.id FROM entries e
                              WHERE e.user_id = ?1 AND e.status = 'unread' AND {GLOBALLY_VISIBLE_CONDITION})"
            );

            let changed = conn
                .execute(&sql, params![user_id.get()])
                .map_err(|e| Error::OperationFailed {
                    operation: "mark_globally_visible_feeds_read".to_string(),
                    cause: e.to_string(),
                })?;
            Ok(changed as u64)
        })();

        record_operation_metrics(
            BACKEND,
            "mark_globally_visible_feeds_read",
            start,
            status_label(&result),
        );
        result
    }
}

impl UserDirectory for SqliteEntryStore {
    #[instrument(skip(self), fields(operation = "user_by_id", backend = "sqlite", user.id = %id))]
    fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let row: Option<(i64, String, String, String)> = conn
                .query_row(
                    "SELECT id, timezone, entry_order, entry_direction FROM users WHERE id = ?1",
                    params![id.get()],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "user_by_id".to_string(),
                    cause: e.to_string(),
                })?;

            Ok(row.map(|(id, timezone, order, direction)| {
                User::new(UserId::new(id), timezone).with_sorting(
                    SortColumn::parse(&order).unwrap_or_default(),
                    SortDirection::parse(&direction).unwrap_or_default(),
                )
            }))
        })();

        record_operation_metrics(BACKEND, "user_by_id", start, status_label(&result));
        result
    }
}
