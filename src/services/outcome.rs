//! Results returned by [`BucketService`](super::BucketService).

use crate::buckets::{Bucket, BucketSelection, PartitionScheme};
use crate::models::{Entry, TimeRange, UserId};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One bucket of a bucketed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketView {
    /// The bucket.
    pub bucket: Bucket,
    /// Human-readable label.
    pub label: &'static str,
    /// The bucket's half-open interval.
    pub range: TimeRange,
    /// Unread, globally visible entries in the interval.
    pub unread_count: u64,
    /// The entries, if this bucket was selected for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

/// A user's unread entries partitioned into time buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketedView {
    /// The user the view was built for.
    pub user_id: UserId,
    /// The scheme used for the boundaries.
    pub scheme: PartitionScheme,
    /// Resolved timezone name.
    pub timezone: String,
    /// The reference instant, in the user's timezone.
    pub reference: DateTime<FixedOffset>,
    /// The selector as given, or the default bucket name.
    pub selector: String,
    /// What was selected after applying the fallback.
    pub selection: BucketSelection,
    /// Whether the selector was unrecognized and fell back to all.
    pub fallback: bool,
    /// Every bucket of the scheme, newest first.
    pub buckets: Vec<BucketView>,
    /// Sum of the per-bucket unread counts.
    pub total_unread: u64,
}

impl BucketedView {
    /// Returns the view of one bucket.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketView> {
        self.buckets.iter().find(|b| b.bucket == bucket)
    }

    /// Returns the unread count of one bucket, or zero if it is not part of
    /// the scheme.
    #[must_use]
    pub fn count(&self, bucket: Bucket) -> u64 {
        self.bucket(bucket).map_or(0, |b| b.unread_count)
    }

    /// Iterates over the displayed entries, bucket by bucket.
    pub fn displayed_entries(&self) -> impl Iterator<Item = &Entry> {
        self.buckets
            .iter()
            .filter_map(|b| b.entries.as_deref())
            .flatten()
    }
}

/// Which mutation primitive a mark-as-read request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkReadScope {
    /// Entries published within one bucket's interval.
    Range {
        /// The bucket.
        bucket: Bucket,
        /// Its interval at the time of the request.
        range: TimeRange,
    },
    /// Every unread entry of the user's globally visible feeds.
    AllGloballyVisible,
}

impl MarkReadScope {
    /// Returns the metrics label for this scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::AllGloballyVisible => "all",
        }
    }
}

/// Result of a bucket-scoped mark-as-read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkReadOutcome {
    /// The user whose entries were marked.
    pub user_id: UserId,
    /// The scheme used to resolve the bucket.
    pub scheme: PartitionScheme,
    /// The reference instant, in the user's timezone.
    pub reference: DateTime<FixedOffset>,
    /// The selector as given.
    pub selector: String,
    /// Whether the selector was unrecognized and fell back to all.
    pub fallback: bool,
    /// The primitive that ran.
    pub scope: MarkReadScope,
    /// Number of entries whose status changed.
    pub entries_marked: u64,
}
