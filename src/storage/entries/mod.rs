//! Entry store implementations.

mod sqlite;

pub use sqlite::{NewEntry, SqliteEntryStore};
