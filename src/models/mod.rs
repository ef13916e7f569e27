//! Data models for feedbuckets.
//!
//! Entries and users are owned by the storage collaborator; the bucketing
//! core only reads the fields modelled here.

mod entry;
mod query;
pub mod temporal;
mod user;

pub use entry::{Entry, EntryId, EntryStatus, FeedId};
pub use query::EntryQuery;
pub use temporal::TimeRange;
pub use user::{SortColumn, SortDirection, User, UserId};
