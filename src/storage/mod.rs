//! Storage layer abstraction.
//!
//! The bucketing services talk to two collaborators:
//! - **Entry store**: counts, fetches and read-status mutations over entries
//! - **User directory**: timezone and sort preference lookup
//!
//! [`SqliteEntryStore`] implements both against a single `SQLite` database.

// Allow significant_drop_tightening - dropping database connections slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

mod entries;
pub mod sqlite;
pub mod traits;

pub use entries::{NewEntry, SqliteEntryStore};
pub use traits::{EntryStore, UserDirectory};
