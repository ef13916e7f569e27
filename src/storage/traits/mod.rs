//! Storage backend traits.

mod entry_store;
mod user_directory;

pub use entry_store::EntryStore;
pub use user_directory::UserDirectory;
