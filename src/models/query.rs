//! Entry query criteria.

use super::{EntryStatus, SortColumn, SortDirection, TimeRange, UserId};
use chrono::{DateTime, Utc};

/// Filter and ordering criteria for counting or fetching a user's entries.
///
/// Built fluently and handed to an [`EntryStore`](crate::storage::EntryStore),
/// which decides how to execute it. Sort clauses apply in the order they were
/// added.
///
/// # Example
///
/// ```rust
/// use feedbuckets::models::{EntryQuery, EntryStatus, SortColumn, SortDirection, UserId};
///
/// let query = EntryQuery::new(UserId::new(1))
///     .with_status(EntryStatus::Unread)
///     .with_globally_visible()
///     .with_sorting(SortColumn::PublishedAt, SortDirection::Desc)
///     .with_sorting(SortColumn::Id, SortDirection::Desc);
///
/// assert_eq!(query.sorting.len(), 2);
/// assert!(query.range.is_unbounded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    /// Owning user.
    pub user_id: UserId,
    /// Restrict to this status.
    pub status: Option<EntryStatus>,
    /// Exclude entries whose feed is hidden from aggregate views.
    pub globally_visible: bool,
    /// Sort clauses, applied in order.
    pub sorting: Vec<(SortColumn, SortDirection)>,
    /// Publication-time window.
    pub range: TimeRange,
}

impl EntryQuery {
    /// Creates a query matching every entry of the user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            status: None,
            globally_visible: false,
            sorting: Vec::new(),
            range: TimeRange::unbounded(),
        }
    }

    /// Restricts to entries with the given status.
    #[must_use]
    pub const fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to entries of feeds that are not hidden globally.
    #[must_use]
    pub const fn with_globally_visible(mut self) -> Self {
        self.globally_visible = true;
        self
    }

    /// Appends a sort clause.
    #[must_use]
    pub fn with_sorting(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sorting.push((column, direction));
        self
    }

    /// Sets the inclusive lower publication bound.
    #[must_use]
    pub const fn after(mut self, timestamp: DateTime<Utc>) -> Self {
        self.range.after = Some(timestamp);
        self
    }

    /// Sets the exclusive upper publication bound.
    #[must_use]
    pub const fn before(mut self, timestamp: DateTime<Utc>) -> Self {
        self.range.before = Some(timestamp);
        self
    }

    /// Replaces both publication bounds with the given range.
    #[must_use]
    pub const fn within(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }
}
