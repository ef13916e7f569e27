//! # Feedbuckets
//!
//! Time-window partitioning of a feed reader's unread entries.
//!
//! Feedbuckets splits a user's unread articles into buckets such as
//! "Today", "Last 2 days" or "Earlier" and supports bulk mark-as-read scoped
//! to one bucket or to everything. The same bucket boundaries drive both the
//! display path and the mutation path, so marking "Today" as read touches
//! exactly what "Today" shows.
//!
//! ## Layers
//!
//! - [`buckets`]: boundary calculation for the rolling-window and
//!   calendar-aligned schemes, plus selector parsing
//! - [`services`]: the bucketed view and the range-scoped mark-as-read
//! - [`storage`]: the entry store and user directory traits, with a `SQLite`
//!   implementation
//! - [`timezone`]: the clock that produces the per-request reference instant
//!
//! ## Example
//!
//! ```rust,ignore
//! use feedbuckets::{BucketService, PartitionScheme, SystemClock, UserId};
//! use feedbuckets::storage::SqliteEntryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteEntryStore::new("entries.db")?);
//! let service = BucketService::new(
//!     store.clone(),
//!     store,
//!     Arc::new(SystemClock),
//!     PartitionScheme::RollingWindow,
//! );
//!
//! let view = service.bucketed_view(UserId::new(1), Some("today"))?;
//! println!("{} unread", view.total_unread);
//!
//! service.mark_bucket_read(UserId::new(1), "last2d")?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod buckets;
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod timezone;

pub use buckets::{
    Bucket, BucketBounds, BucketSelection, BucketSelector, BucketSet, BoundaryCalculator,
    PartitionScheme,
};
pub use config::FeedBucketsConfig;
pub use models::{
    Entry, EntryId, EntryQuery, EntryStatus, FeedId, SortColumn, SortDirection, TimeRange, User,
    UserId,
};
pub use services::{BucketService, BucketView, BucketedView, MarkReadOutcome, MarkReadScope};
pub use storage::{EntryStore, UserDirectory};
pub use timezone::{Clock, FixedClock, SystemClock};

/// Error type for feedbuckets operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed CLI arguments, unparseable timestamps, bad config values |
/// | `OperationFailed` | Storage queries or mutations fail, config files cannot be read |
/// | `UserNotFound` | The user directory has no record for the requested identity |
///
/// An unrecognized bucket selector is never an error; it resolves to the
/// documented fallback instead.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` queries or mutations fail
    /// - Filesystem I/O errors occur while loading configuration
    /// - Logging cannot be initialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The user could not be resolved.
    #[error("user {0} not found")]
    UserNotFound(UserId),
}

/// Result type alias for feedbuckets operations.
pub type Result<T> = std::result::Result<T, Error>;
