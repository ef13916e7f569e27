//! Users and their display preferences.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Creates a new user ID.
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Column an entry list can be ordered by.
///
/// Closed set: column names reach SQL only through [`SortColumn::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Entry identity; used as the tie-break column.
    Id,
    /// Publication timestamp.
    #[default]
    PublishedAt,
    /// Storage timestamp.
    CreatedAt,
    /// Entry title.
    Title,
}

impl SortColumn {
    /// Returns the column name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PublishedAt => "published_at",
            Self::CreatedAt => "created_at",
            Self::Title => "title",
        }
    }

    /// Parses a column name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "published_at" | "published" => Some(Self::PublishedAt),
            "created_at" | "created" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest / smallest first.
    #[default]
    Asc,
    /// Newest / largest first.
    Desc,
}

impl SortDirection {
    /// Returns the direction as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parses a direction string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A feed reader user.
///
/// Only the fields the bucketed view depends on are modelled: the timezone
/// that anchors the reference instant and the preferred entry ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// IANA timezone name, e.g. `Europe/Paris`.
    pub timezone: String,
    /// Preferred sort column.
    pub entry_order: SortColumn,
    /// Preferred sort direction.
    pub entry_direction: SortDirection,
}

impl User {
    /// Creates a user with default sort preferences.
    #[must_use]
    pub fn new(id: UserId, timezone: impl Into<String>) -> Self {
        Self {
            id,
            timezone: timezone.into(),
            entry_order: SortColumn::default(),
            entry_direction: SortDirection::default(),
        }
    }

    /// Sets the preferred ordering.
    #[must_use]
    pub const fn with_sorting(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.entry_order = column;
        self.entry_direction = direction;
        self
    }
}
