//! Time-window partitioning.
//!
//! Turns a reference instant into an ordered, gap-free, non-overlapping set
//! of buckets, and parses the selectors callers use to address them.
//!
//! # Schemes
//!
//! | Scheme | Buckets (newest first) | Boundaries |
//! |--------|------------------------|------------|
//! | `rolling` | `today`, `last2d`, `last7d`, `last30d`, `earlier` | now − 24h / 48h / 7d / 30d |
//! | `calendar` | `today`, `yesterday`, `week`, `month`, `earlier` | local midnight, Sunday, 1st of month |
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use feedbuckets::buckets::{Bucket, BoundaryCalculator, PartitionScheme};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//! let set = BoundaryCalculator::compute(&now, PartitionScheme::RollingWindow);
//!
//! let published = Utc.with_ymd_and_hms(2024, 6, 14, 13, 0, 0).unwrap();
//! assert_eq!(set.locate(published), Some(Bucket::Today));
//! ```

mod calculator;
mod scheme;
mod selector;

pub use calculator::{BoundaryCalculator, BucketBounds, BucketSet};
pub use scheme::{Bucket, PartitionScheme};
pub use selector::{ALL_SELECTOR, BucketSelection, BucketSelector};
