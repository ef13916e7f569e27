//! Boundary calculation.
//!
//! Both schemes reduce to four boundary instants, newest first. Bucket `i`
//! spans `[boundary[i], boundary[i - 1])`; the newest bucket has no upper
//! bound and the oldest has no lower bound, so the set covers the whole
//! timeline.

use super::{Bucket, PartitionScheme};
use crate::models::TimeRange;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

/// Rolling-window boundary offsets from the reference instant, in hours.
const ROLLING_WINDOW_HOURS: [i64; 4] = [24, 48, 7 * 24, 30 * 24];

/// How far past a skipped local midnight to look for the first valid instant.
const DST_GAP_SEARCH_HOURS: i64 = 3;

/// One bucket and its publication-time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketBounds {
    /// The bucket.
    pub bucket: Bucket,
    /// Its half-open interval.
    pub range: TimeRange,
}

/// The ordered buckets of one scheme for one reference instant.
///
/// Newest bucket first. Every timestamp lies in exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSet {
    scheme: PartitionScheme,
    reference: DateTime<Utc>,
    bounds: Vec<BucketBounds>,
}

impl BucketSet {
    /// Returns the scheme that produced this set.
    #[must_use]
    pub const fn scheme(&self) -> PartitionScheme {
        self.scheme
    }

    /// Returns the reference instant the boundaries were derived from.
    #[must_use]
    pub const fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Iterates over the buckets, newest first.
    pub fn iter(&self) -> std::slice::Iter<'_, BucketBounds> {
        self.bounds.iter()
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Returns `true` if the set has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Returns the bounds of a bucket, if it belongs to this scheme.
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> Option<&BucketBounds> {
        self.bounds.iter().find(|b| b.bucket == bucket)
    }

    /// Returns the interval of a bucket, if it belongs to this scheme.
    #[must_use]
    pub fn range_of(&self, bucket: Bucket) -> Option<TimeRange> {
        self.get(bucket).map(|b| b.range)
    }

    /// Returns the bucket containing the given timestamp.
    #[must_use]
    pub fn locate(&self, timestamp: DateTime<Utc>) -> Option<Bucket> {
        self.bounds
            .iter()
            .find(|b| b.range.contains(timestamp))
            .map(|b| b.bucket)
    }
}

impl<'a> IntoIterator for &'a BucketSet {
    type Item = &'a BucketBounds;
    type IntoIter = std::slice::Iter<'a, BucketBounds>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Derives bucket boundaries from a reference instant.
///
/// Stateless and deterministic: the same reference instant (including its
/// timezone) and scheme always yield the same set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryCalculator;

impl BoundaryCalculator {
    /// Computes the bucket set for `reference` under `scheme`.
    ///
    /// `reference` must already be expressed in the user's timezone; the
    /// calendar scheme snaps to midnights of that zone.
    #[must_use]
    pub fn compute<Tz: TimeZone>(reference: &DateTime<Tz>, scheme: PartitionScheme) -> BucketSet {
        let boundaries = match scheme {
            PartitionScheme::RollingWindow => rolling_boundaries(reference.with_timezone(&Utc)),
            PartitionScheme::CalendarAligned => calendar_boundaries(reference),
        };

        let buckets = scheme.buckets();
        let bounds = buckets
            .iter()
            .enumerate()
            .map(|(i, &bucket)| BucketBounds {
                bucket,
                range: TimeRange {
                    after: boundaries.get(i).copied(),
                    before: i.checked_sub(1).and_then(|prev| boundaries.get(prev)).copied(),
                },
            })
            .collect();

        BucketSet {
            scheme,
            reference: reference.with_timezone(&Utc),
            bounds,
        }
    }
}

fn rolling_boundaries(now: DateTime<Utc>) -> [DateTime<Utc>; 4] {
    ROLLING_WINDOW_HOURS.map(|hours| {
        now.checked_sub_signed(TimeDelta::hours(hours))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    })
}

fn calendar_boundaries<Tz: TimeZone>(reference: &DateTime<Tz>) -> [DateTime<Utc>; 4] {
    let tz = reference.timezone();
    let date = reference.date_naive();

    let today = local_midnight(&tz, date);
    let yesterday = date
        .pred_opt()
        .map_or(today, |d| local_midnight(&tz, d));
    let week = date
        .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        .map_or(today, |d| local_midnight(&tz, d));
    let month = date
        .with_day(1)
        .map_or(today, |d| local_midnight(&tz, d));

    // On Sundays the week starts today; on the 1st the month starts after
    // the week does. Clamping keeps the boundaries non-increasing so those
    // buckets come out empty instead of overlapping.
    let yesterday = yesterday.min(today);
    let week = week.min(yesterday);
    let month = month.min(week);

    [today, yesterday, week, month]
}

/// Returns the first instant of `date` in `tz`.
///
/// Ambiguous midnights resolve to the earlier instant. A midnight skipped by
/// a DST transition resolves to the first valid local hour after it.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=DST_GAP_SEARCH_HOURS)
        .filter_map(|hours| midnight.checked_add_signed(TimeDelta::hours(hours)))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map_or_else(
            || tz.from_utc_datetime(&midnight).with_timezone(&Utc),
            |dt| dt.with_timezone(&Utc),
        )
}
