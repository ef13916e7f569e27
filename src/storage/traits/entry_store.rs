//! Entry store trait.
//!
//! The entry store executes [`EntryQuery`] values and applies read-status
//! mutations. It owns the entry schema; the bucketing services only describe
//! what they want.
//!
//! # Error Modes and Guarantees
//!
//! All methods return `Result<T>` with errors propagated via [`crate::Error`].
//! Services treat any error as fatal for the current request and do not
//! retry.
//!
//! | Method | Atomicity | Idempotent |
//! |--------|-----------|------------|
//! | `count_entries` | Single statement | Yes |
//! | `fetch_entries` | Single statement | Yes |
//! | `mark_entries_read_in_range` | Single statement | Yes |
//! | `mark_globally_visible_feeds_read` | Single statement | Yes |

use crate::Result;
use crate::models::{Entry, EntryQuery, TimeRange, UserId};

/// Trait for entry storage backends.
///
/// # Implementor Notes
///
/// - Methods use `&self` to enable sharing via `Arc<dyn EntryStore>`
/// - Use interior mutability (e.g., `Mutex<Connection>`) for mutable state
/// - Apply `range.after` as an inclusive and `range.before` as an exclusive
///   bound on the publication timestamp
/// - Apply sort clauses in the order they appear in the query
pub trait EntryStore: Send + Sync {
    /// Counts entries matching the query. Sorting is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the count fails.
    fn count_entries(&self, query: &EntryQuery) -> Result<u64>;

    /// Fetches entries matching the query, in the query's sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>>;

    /// Marks the user's unread, globally visible entries published within
    /// `range` as read.
    ///
    /// Returns the number of entries that changed status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails; no partial update is reported.
    fn mark_entries_read_in_range(&self, user_id: UserId, range: &TimeRange) -> Result<u64>;

    /// Marks every unread entry of the user's globally visible feeds as read,
    /// regardless of publication time.
    ///
    /// Returns the number of entries that changed status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails; no partial update is reported.
    fn mark_globally_visible_feeds_read(&self, user_id: UserId) -> Result<u64>;
}
