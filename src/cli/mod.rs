//! CLI command implementations.
//!
//! The binary parses arguments and prints; the functions here build the
//! output so they can be tested without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `boundaries` | Print the bucket set for a timezone and instant |
//! | `view` | Show a user's unread entries partitioned into buckets |
//! | `mark-read` | Mark one bucket (or everything) as read |
//! | `user add` | Create a user with a timezone and sort preference |
//! | `feed add` | Create a feed, optionally hidden from aggregate views |
//! | `entry add` | Insert an entry |
//!
//! # Example Usage
//!
//! ```bash
//! feedbuckets user add --timezone Europe/Paris
//! feedbuckets feed add --user 1 --title "Hacker News"
//! feedbuckets entry add --user 1 --feed 1 --title "Launch" --published 2024-06-15T08:00:00Z
//! feedbuckets view --user 1 --bucket all
//! feedbuckets mark-read --user 1 --bucket today
//! ```

mod boundaries;
mod mark_read;
mod seed;
mod view;

pub use boundaries::render_boundaries;
pub use mark_read::render_mark_read;
pub use seed::{parse_direction, parse_sort_column, parse_timestamp};
pub use view::render_view;

use crate::{Error, Result};
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Serializes a command result as pretty JSON.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_output".to_string(),
        cause: e.to_string(),
    })
}
