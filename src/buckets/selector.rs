//! Bucket selector parsing.

use super::{Bucket, PartitionScheme};
use serde::Serialize;
use std::fmt;

/// Selector value that addresses every bucket at once.
pub const ALL_SELECTOR: &str = "all";

/// A caller-supplied bucket selector, parsed against one scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSelector {
    /// A bucket of the active scheme.
    Bucket(Bucket),
    /// The `all` sentinel.
    All,
    /// Anything else, kept verbatim for logging.
    Unrecognized(String),
}

impl BucketSelector {
    /// Parses a raw selector against the active scheme.
    ///
    /// Never fails: unknown values (including bucket names of the other
    /// scheme) become [`BucketSelector::Unrecognized`].
    #[must_use]
    pub fn parse(raw: &str, scheme: PartitionScheme) -> Self {
        if raw.trim().eq_ignore_ascii_case(ALL_SELECTOR) {
            return Self::All;
        }
        scheme
            .bucket_named(raw)
            .map_or_else(|| Self::Unrecognized(raw.to_string()), Self::Bucket)
    }

    /// Returns what the selector addresses after applying the fallback.
    ///
    /// Unrecognized selectors address every bucket: the display path shows
    /// the aggregate view and the mutation path marks everything read.
    #[must_use]
    pub const fn resolve(&self) -> BucketSelection {
        match self {
            Self::Bucket(bucket) => BucketSelection::Bucket(*bucket),
            Self::All | Self::Unrecognized(_) => BucketSelection::All,
        }
    }

    /// Returns `true` if [`resolve`](Self::resolve) had to fall back.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for BucketSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(bucket) => write!(f, "{bucket}"),
            Self::All => write!(f, "{ALL_SELECTOR}"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// The resolved target of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSelection {
    /// One bucket.
    Bucket(Bucket),
    /// Every bucket.
    All,
}

impl BucketSelection {
    /// Returns `true` if the selection includes `bucket`.
    #[must_use]
    pub fn includes(&self, bucket: Bucket) -> bool {
        match self {
            Self::Bucket(selected) => *selected == bucket,
            Self::All => true,
        }
    }
}

impl fmt::Display for BucketSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(bucket) => write!(f, "{bucket}"),
            Self::All => write!(f, "{ALL_SELECTOR}"),
        }
    }
}
