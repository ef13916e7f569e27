//! Bucketed unread view and bucket-scoped mark-as-read.

use super::{BucketView, BucketedView, MarkReadOutcome, MarkReadScope};
use crate::buckets::{BoundaryCalculator, BucketSelection, BucketSelector, BucketSet, PartitionScheme};
use crate::models::{EntryQuery, EntryStatus, SortColumn, User, UserId};
use crate::observability::current_request;
use crate::storage::{EntryStore, UserDirectory};
use crate::timezone::{Clock, resolve_timezone};
use crate::{Error, Result};
use chrono::{DateTime, SubsecRound};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Service partitioning a user's unread entries into time buckets.
///
/// The display path and the mutation path share one [`PartitionScheme`], so
/// marking a bucket as read touches the entries that bucket displays.
pub struct BucketService {
    entries: Arc<dyn EntryStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    scheme: PartitionScheme,
}

/// Per-request state shared by both operations.
struct RequestFrame {
    user: User,
    tz: Tz,
    reference: DateTime<Tz>,
    buckets: BucketSet,
}

impl BucketService {
    /// Creates a new bucket service.
    #[must_use]
    pub fn new(
        entries: Arc<dyn EntryStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        scheme: PartitionScheme,
    ) -> Self {
        Self {
            entries,
            users,
            clock,
            scheme,
        }
    }

    /// Returns the configured scheme.
    #[must_use]
    pub const fn scheme(&self) -> PartitionScheme {
        self.scheme
    }

    /// Builds the bucketed view of a user's unread entries.
    ///
    /// Every bucket gets an unread count. Entries are fetched for the
    /// selected bucket only, or for every bucket when the selector is `all`
    /// or unrecognized. With no selector the scheme's default bucket is
    /// shown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the user does not exist, or the
    /// first storage error; no partial view is returned.
    #[instrument(
        name = "feedbuckets.view",
        skip(self, selector),
        fields(
            request_id = tracing::field::Empty,
            command = tracing::field::Empty,
            user_id = %user_id,
            scheme = %self.scheme,
            selector = selector.unwrap_or_default()
        )
    )]
    pub fn bucketed_view(&self, user_id: UserId, selector: Option<&str>) -> Result<BucketedView> {
        let start = Instant::now();
        record_request_context();

        let selector = selector.map_or_else(
            || BucketSelector::Bucket(self.scheme.default_bucket()),
            |raw| BucketSelector::parse(raw, self.scheme),
        );
        let selection = selector.resolve();

        let result = (|| {
            let frame = self.frame(user_id)?;
            if selector.is_fallback() {
                report_fallback(&selector, "view");
            }

            let mut buckets = Vec::with_capacity(frame.buckets.len());
            for bounds in &frame.buckets {
                let unread = EntryQuery::new(frame.user.id)
                    .with_status(EntryStatus::Unread)
                    .with_globally_visible()
                    .within(bounds.range);

                let unread_count = self.entries.count_entries(&unread)?;
                let entries = if selection.includes(bounds.bucket) {
                    Some(self.entries.fetch_entries(&sorted_for(&frame.user, unread))?)
                } else {
                    None
                };

                debug!(
                    bucket = %bounds.bucket,
                    range = %bounds.range,
                    unread_count,
                    fetched = entries.as_ref().map_or(0, Vec::len),
                    "Bucket resolved"
                );

                buckets.push(BucketView {
                    bucket: bounds.bucket,
                    label: bounds.bucket.label(),
                    range: bounds.range,
                    unread_count,
                    entries,
                });
            }

            let total_unread = buckets.iter().map(|b| b.unread_count).sum();
            info!(
                user_id = %frame.user.id,
                selection = %selection,
                total_unread,
                "Built bucketed view"
            );

            Ok(BucketedView {
                user_id: frame.user.id,
                scheme: self.scheme,
                timezone: frame.tz.name().to_string(),
                reference: frame.reference.fixed_offset(),
                selector: selector.to_string(),
                selection,
                fallback: selector.is_fallback(),
                buckets,
                total_unread,
            })
        })();

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "bucket_view_requests_total",
            "scheme" => self.scheme.as_str(),
            "selection" => selection_label(selection),
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "bucket_view_duration_ms",
            "scheme" => self.scheme.as_str()
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        result
    }

    /// Marks the entries of one bucket as read.
    ///
    /// A concrete bucket resolves to its interval under the configured scheme
    /// and marks the unread, globally visible entries published within it.
    /// `all` and unrecognized selectors mark every unread entry of the
    /// user's globally visible feeds instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the user does not exist, or the
    /// storage error of the mutation.
    #[instrument(
        name = "feedbuckets.mark_read",
        skip(self, selector),
        fields(
            request_id = tracing::field::Empty,
            command = tracing::field::Empty,
            user_id = %user_id,
            scheme = %self.scheme,
            selector = selector
        )
    )]
    pub fn mark_bucket_read(&self, user_id: UserId, selector: &str) -> Result<MarkReadOutcome> {
        let start = Instant::now();
        record_request_context();

        let selector = BucketSelector::parse(selector, self.scheme);
        let mut scope_label = selection_label(selector.resolve());

        let result = (|| {
            let frame = self.frame(user_id)?;
            if selector.is_fallback() {
                report_fallback(&selector, "mark_read");
            }

            let scope = match selector.resolve() {
                BucketSelection::Bucket(bucket) => {
                    let range = frame.buckets.range_of(bucket).ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "bucket '{bucket}' is not part of the {} scheme",
                            self.scheme
                        ))
                    })?;
                    MarkReadScope::Range { bucket, range }
                },
                BucketSelection::All => MarkReadScope::AllGloballyVisible,
            };
            scope_label = scope.as_str();

            let entries_marked = match scope {
                MarkReadScope::Range { range, .. } => {
                    self.entries.mark_entries_read_in_range(frame.user.id, &range)?
                },
                MarkReadScope::AllGloballyVisible => {
                    self.entries.mark_globally_visible_feeds_read(frame.user.id)?
                },
            };

            info!(
                user_id = %frame.user.id,
                scope = scope.as_str(),
                entries_marked,
                "Marked bucket as read"
            );

            Ok(MarkReadOutcome {
                user_id: frame.user.id,
                scheme: self.scheme,
                reference: frame.reference.fixed_offset(),
                selector: selector.to_string(),
                fallback: selector.is_fallback(),
                scope,
                entries_marked,
            })
        })();

        let status = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "bucket_mark_read_total",
            "scheme" => self.scheme.as_str(),
            "scope" => scope_label,
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "bucket_mark_read_duration_ms",
            "scheme" => self.scheme.as_str()
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        result
    }

    /// Resolves the user and derives the request's bucket set.
    ///
    /// The clock is read exactly once; the reference instant is truncated to
    /// whole seconds to match the store's timestamp precision.
    fn frame(&self, user_id: UserId) -> Result<RequestFrame> {
        let user = self
            .users
            .user_by_id(user_id)?
            .ok_or(Error::UserNotFound(user_id))?;
        let tz = resolve_timezone(&user.timezone);
        let reference = self.clock.now(tz).trunc_subsecs(0);
        let buckets = BoundaryCalculator::compute(&reference, self.scheme);

        Ok(RequestFrame {
            user,
            tz,
            reference,
            buckets,
        })
    }
}

/// Applies the user's sort preference with an `id` tie-break in the same
/// direction.
fn sorted_for(user: &User, query: EntryQuery) -> EntryQuery {
    let query = query.with_sorting(user.entry_order, user.entry_direction);
    if user.entry_order == SortColumn::Id {
        query
    } else {
        query.with_sorting(SortColumn::Id, user.entry_direction)
    }
}

fn record_request_context() {
    if let Some(context) = current_request() {
        let span = tracing::Span::current();
        span.record("request_id", tracing::field::display(context.id()));
        span.record("command", context.command());
    }
}

fn report_fallback(selector: &BucketSelector, path: &'static str) {
    warn!(
        selector = %selector,
        path,
        "Unrecognized bucket selector, falling back to all"
    );
    metrics::counter!("bucket_selector_fallback_total", "path" => path).increment(1);
}

const fn selection_label(selection: BucketSelection) -> &'static str {
    match selection {
        BucketSelection::Bucket(_) => "bucket",
        BucketSelection::All => "all",
    }
}
