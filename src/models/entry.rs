//! Feed entries as seen by the bucketed view.

use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(i64);

impl EntryId {
    /// Creates a new entry ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeedId(i64);

impl FeedId {
    /// Creates a new feed ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw ID.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FeedId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Read status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not yet read.
    #[default]
    Unread,
    /// Read by the user.
    Read,
    /// Removed from the user's lists.
    Removed,
}

impl EntryStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Removed => "removed",
        }
    }

    /// Parses a status string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unread" => Some(Self::Unread),
            "read" => Some(Self::Read),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub id: EntryId,
    /// Owning user.
    pub user_id: UserId,
    /// Feed the entry was published in.
    pub feed_id: FeedId,
    /// Entry title.
    pub title: String,
    /// Link to the article.
    pub url: String,
    /// Publication timestamp, the partitioning key.
    pub published_at: DateTime<Utc>,
    /// When the entry was stored.
    pub created_at: DateTime<Utc>,
    /// Read status.
    pub status: EntryStatus,
}
