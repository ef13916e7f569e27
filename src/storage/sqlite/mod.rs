//! Shared `SQLite` infrastructure for the entry store.
//!
//! ## Module Structure
//!
//! - [`connection`]: mutex handling and connection pragmas
//! - [`sql`]: filter and ordering clauses with numbered parameters
//! - [`entry_row`]: row conversion into [`Entry`](crate::models::Entry)
//! - [`metrics`]: storage metrics helpers

mod connection;
mod entry_row;
mod metrics;
mod sql;

pub use connection::{BUSY_TIMEOUT_MS, acquire_lock, configure_connection};
pub use entry_row::{ENTRY_COLUMNS, EntryRow, build_entry_from_row};
pub use metrics::{record_operation_metrics, status_label};
pub use sql::{
    FilterClause, GLOBALLY_VISIBLE_CONDITION, build_filter_clause, build_mark_read_clause,
    build_order_clause,
};
