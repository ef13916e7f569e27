//! Shared connection handling for the `SQLite` entry store.
//!
//! This module provides utilities for managing `SQLite` connections with proper
//! mutex handling, poison recovery, and performance configuration.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Busy timeout applied to every connection, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Helper to acquire mutex lock with poison recovery.
///
/// If the mutex is poisoned (due to a panic in a previous critical section),
/// we recover the inner value and log a warning. The connection itself holds
/// no Rust-side invariants that a panic could have broken.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Configures a `SQLite` connection for concurrent readers.
///
/// # Configuration Applied
///
/// - **WAL mode**: concurrent readers with a single writer
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: waits instead of failing with `SQLITE_BUSY`
/// - **`foreign_keys`**: enforces feed and user ownership
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if foreign keys cannot be enabled.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    // journal_mode returns a row ("wal" or "memory"), so the result is ignored
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS);

    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| Error::OperationFailed {
            operation: "enable_foreign_keys".to_string(),
            cause: e.to_string(),
        })
}
