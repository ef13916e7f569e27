//! Half-open publication-time intervals.
//!
//! Every bucket is a [`TimeRange`] of the form `[after, before)`:
//!
//! | Bound | Inclusive | Absent means |
//! |-------|-----------|--------------|
//! | `after` | yes | unbounded past |
//! | `before` | no | unbounded future |
//!
//! Two adjacent buckets share one boundary instant. Because `after` is
//! inclusive and `before` is exclusive, an entry published exactly at that
//! instant belongs to the newer bucket only.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use feedbuckets::models::TimeRange;
//!
//! let boundary = Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap();
//! let newer = TimeRange::from(boundary);
//! let older = TimeRange::until(boundary);
//!
//! assert!(newer.contains(boundary));
//! assert!(!older.contains(boundary));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open interval `[after, before)` over publication timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the interval (inclusive), `None` for unbounded past.
    pub after: Option<DateTime<Utc>>,
    /// End of the interval (exclusive), `None` for unbounded future.
    pub before: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Creates a range covering the whole timeline.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            after: None,
            before: None,
        }
    }

    /// Creates a range starting at `after` with no upper bound.
    #[must_use]
    pub const fn from(after: DateTime<Utc>) -> Self {
        Self {
            after: Some(after),
            before: None,
        }
    }

    /// Creates a range ending (exclusively) at `before` with no lower bound.
    #[must_use]
    pub const fn until(before: DateTime<Utc>) -> Self {
        Self {
            after: None,
            before: Some(before),
        }
    }

    /// Creates a bounded range.
    #[must_use]
    pub const fn between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            after: Some(after),
            before: Some(before),
        }
    }

    /// Checks if the given timestamp falls within this range.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let after_start = self.after.is_none_or(|a| timestamp >= a);
        let before_end = self.before.is_none_or(|b| timestamp < b);
        after_start && before_end
    }

    /// Checks if this range is unbounded on both ends.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.before.is_none()
    }

    /// Checks if no timestamp can fall within this range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.after, self.before), (Some(a), Some(b)) if a >= b)
    }

    /// Checks if at least one timestamp lies in both ranges.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let after = match (self.after, other.after) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let before = match (self.before, other.before) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        !Self { after, before }.is_empty()
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.after, self.before) {
            (None, None) => write!(f, "[-∞, ∞)"),
            (Some(a), None) => write!(f, "[{}, ∞)", a.to_rfc3339()),
            (None, Some(b)) => write!(f, "[-∞, {})", b.to_rfc3339()),
            (Some(a), Some(b)) => write!(f, "[{}, {})", a.to_rfc3339(), b.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let range = TimeRange::unbounded();
        assert!(range.is_unbounded());
        assert!(range.contains(DateTime::<Utc>::MIN_UTC));
        assert!(range.contains(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_after_is_inclusive() {
        let range = TimeRange::from(at(10));
        assert!(range.contains(at(10)));
        assert!(!range.contains(at(10) - TimeDelta::seconds(1)));
        assert!(range.contains(at(23)));
    }

    #[test]
    fn test_before_is_exclusive() {
        let range = TimeRange::until(at(10));
        assert!(!range.contains(at(10)));
        assert!(range.contains(at(10) - TimeDelta::seconds(1)));
    }

    #[test]
    fn test_between() {
        let range = TimeRange::between(at(8), at(10));
        assert!(!range.contains(at(7)));
        assert!(range.contains(at(8)));
        assert!(range.contains(at(9)));
        assert!(!range.contains(at(10)));
    }

    #[test]
    fn test_is_empty() {
        assert!(TimeRange::between(at(10), at(10)).is_empty());
        assert!(TimeRange::between(at(11), at(10)).is_empty());
        assert!(!TimeRange::between(at(9), at(10)).is_empty());
        assert!(!TimeRange::from(at(9)).is_empty());
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let older = TimeRange::between(at(8), at(10));
        let newer = TimeRange::from(at(10));
        assert!(!older.overlaps(&newer));
        assert!(!newer.overlaps(&older));

        let spanning = TimeRange::until(at(9));
        assert!(spanning.overlaps(&older));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(TimeRange::unbounded().to_string(), "[-∞, ∞)");
        assert_eq!(
            TimeRange::from(at(8)).to_string(),
            "[2024-06-15T08:00:00+00:00, ∞)"
        );
        assert_eq!(
            TimeRange::until(at(8)).to_string(),
            "[-∞, 2024-06-15T08:00:00+00:00)"
        );
    }
}
