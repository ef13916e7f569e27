//! Bucket names and partitioning schemes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named time partition.
///
/// Which buckets exist depends on the [`PartitionScheme`]; `Today` and
/// `Earlier` appear in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Most recent partition.
    Today,
    /// Calendar: the previous local day.
    Yesterday,
    /// Calendar: from the local week start (Sunday) up to yesterday.
    #[serde(rename = "week")]
    ThisWeek,
    /// Calendar: from the local month start up to the week start.
    #[serde(rename = "month")]
    ThisMonth,
    /// Rolling: 24 to 48 hours ago.
    #[serde(rename = "last2d")]
    Last2Days,
    /// Rolling: 48 hours to 7 days ago.
    #[serde(rename = "last7d")]
    Last7Days,
    /// Rolling: 7 to 30 days ago.
    #[serde(rename = "last30d")]
    Last30Days,
    /// Everything older than the oldest bounded partition.
    Earlier,
}

impl Bucket {
    /// Returns the selector name of the bucket.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "week",
            Self::ThisMonth => "month",
            Self::Last2Days => "last2d",
            Self::Last7Days => "last7d",
            Self::Last30Days => "last30d",
            Self::Earlier => "earlier",
        }
    }

    /// Returns a human-readable heading.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::Last2Days => "Last 2 days",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Earlier => "Earlier",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const ROLLING_BUCKETS: [Bucket; 5] = [
    Bucket::Today,
    Bucket::Last2Days,
    Bucket::Last7Days,
    Bucket::Last30Days,
    Bucket::Earlier,
];

const CALENDAR_BUCKETS: [Bucket; 5] = [
    Bucket::Today,
    Bucket::Yesterday,
    Bucket::ThisWeek,
    Bucket::ThisMonth,
    Bucket::Earlier,
];

/// How bucket boundaries are derived from the reference instant.
///
/// The two schemes are not interchangeable: "today" means the last 24 hours
/// in one and "since local midnight" in the other. A deployment picks one and
/// uses it for both displaying and marking buckets as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartitionScheme {
    /// Fixed offsets from the reference instant: 24h, 48h, 7d, 30d.
    #[default]
    #[serde(rename = "rolling", alias = "rolling-window")]
    RollingWindow,
    /// Local midnight, local week start (Sunday) and local month start.
    #[serde(rename = "calendar", alias = "calendar-aligned")]
    CalendarAligned,
}

impl PartitionScheme {
    /// Returns the scheme as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RollingWindow => "rolling",
            Self::CalendarAligned => "calendar",
        }
    }

    /// Parses a scheme name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rolling" | "rolling-window" | "rolling_window" => Some(Self::RollingWindow),
            "calendar" | "calendar-aligned" | "calendar_aligned" => Some(Self::CalendarAligned),
            _ => None,
        }
    }

    /// Returns the buckets of this scheme, newest first.
    #[must_use]
    pub const fn buckets(&self) -> &'static [Bucket] {
        match self {
            Self::RollingWindow => &ROLLING_BUCKETS,
            Self::CalendarAligned => &CALENDAR_BUCKETS,
        }
    }

    /// Returns the bucket shown when the caller selects nothing.
    #[must_use]
    pub const fn default_bucket(&self) -> Bucket {
        Bucket::Today
    }

    /// Looks up a bucket of this scheme by selector name.
    ///
    /// Matching ignores case and surrounding whitespace. Names that belong to
    /// the other scheme are not found.
    #[must_use]
    pub fn bucket_named(&self, name: &str) -> Option<Bucket> {
        let name = name.trim();
        self.buckets()
            .iter()
            .copied()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PartitionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
