//! Integration tests for feedbuckets.
//!
//! Exercises `BucketService` end to end against the `SQLite` store, and
//! against recording and failing doubles for the error paths.
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::too_many_lines,
    clippy::doc_markdown
)]

use chrono::{DateTime, TimeZone, Utc};
use feedbuckets::storage::{NewEntry, SqliteEntryStore};
use feedbuckets::{
    Bucket, BucketSelection, BucketService, EntryQuery, EntryStatus, EntryStore, Error, FeedId,
    FixedClock, MarkReadScope, PartitionScheme, SortColumn, SortDirection, UserId,
};
use std::sync::Arc;

fn utc(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// A store with one user, one visible and one hidden feed, and a clock
/// frozen at the given instant.
struct World {
    store: Arc<SqliteEntryStore>,
    service: BucketService,
    user: UserId,
    visible: FeedId,
    hidden: FeedId,
}

impl World {
    fn new(scheme: PartitionScheme, timezone: &str, now: &str) -> Self {
        let store = Arc::new(SqliteEntryStore::in_memory().unwrap());
        let user = store
            .create_user(timezone, SortColumn::PublishedAt, SortDirection::Asc)
            .unwrap()
            .id;
        let visible = store.create_feed(user, "Visible", false).unwrap();
        let hidden = store.create_feed(user, "Hidden", true).unwrap();
        let service = BucketService::new(
            store.clone(),
            store.clone(),
            Arc::new(FixedClock::new(utc(now))),
            scheme,
        );
        Self {
            store,
            service,
            user,
            visible,
            hidden,
        }
    }

    fn add(&self, feed: FeedId, published: &str) -> feedbuckets::EntryId {
        self.store
            .insert_entry(&NewEntry::new(self.user, feed, published, utc(published)))
            .unwrap()
    }

    fn direct_unread_count(&self) -> u64 {
        self.store
            .count_entries(
                &EntryQuery::new(self.user)
                    .with_status(EntryStatus::Unread)
                    .with_globally_visible(),
            )
            .unwrap()
    }
}

mod rolling_window {
    use super::*;

    const NOW: &str = "2024-06-15T12:00:00Z";

    #[test]
    fn test_entries_land_in_expected_buckets() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", NOW);
        world.add(world.visible, "2024-06-14T13:00:00Z");
        world.add(world.visible, "2024-06-14T11:00:00Z");
        world.add(world.visible, "2024-06-10T12:00:00Z");
        world.add(world.visible, "2024-05-20T12:00:00Z");
        world.add(world.visible, "2023-01-01T00:00:00Z");

        let view = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(view.count(Bucket::Today), 1);
        assert_eq!(view.count(Bucket::Last2Days), 1);
        assert_eq!(view.count(Bucket::Last7Days), 1);
        assert_eq!(view.count(Bucket::Last30Days), 1);
        assert_eq!(view.count(Bucket::Earlier), 1);
        assert_eq!(view.total_unread, 5);
    }

    #[test]
    fn test_boundary_instant_belongs_to_newer_bucket() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", NOW);
        // Exactly 24h and exactly 48h before the reference
        world.add(world.visible, "2024-06-14T12:00:00Z");
        world.add(world.visible, "2024-06-13T12:00:00Z");

        let view = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(view.count(Bucket::Today), 1);
        assert_eq!(view.count(Bucket::Last2Days), 1);
        assert_eq!(view.count(Bucket::Last7Days), 0);
    }

    #[test]
    fn test_future_entries_count_as_today() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", NOW);
        world.add(world.visible, "2024-06-16T00:00:00Z");

        let view = world.service.bucketed_view(world.user, None).unwrap();
        assert_eq!(view.count(Bucket::Today), 1);
    }

    #[test]
    fn test_selected_bucket_is_the_only_one_fetched() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", NOW);
        world.add(world.visible, "2024-06-14T13:00:00Z");
        world.add(world.visible, "2024-06-12T13:00:00Z");

        let view = world
            .service
            .bucketed_view(world.user, Some("LAST7D"))
            .unwrap();
        assert_eq!(view.selection, BucketSelection::Bucket(Bucket::Last7Days));
        for bucket in &view.buckets {
            assert_eq!(bucket.entries.is_some(), bucket.bucket == Bucket::Last7Days);
        }
        let titles: Vec<&str> = view.displayed_entries().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["2024-06-12T13:00:00Z"]);
    }
}

mod calendar_aligned {
    use super::*;

    #[test]
    fn test_buckets_follow_local_midnight() {
        // 22:30 UTC on Wednesday June 12 is 00:30 on Thursday June 13 in Paris
        let world = World::new(
            PartitionScheme::CalendarAligned,
            "Europe/Paris",
            "2024-06-12T22:30:00Z",
        );
        world.add(world.visible, "2024-06-12T22:15:00Z"); // 00:15 Thu local
        world.add(world.visible, "2024-06-12T21:00:00Z"); // 23:00 Wed local
        world.add(world.visible, "2024-06-10T08:00:00Z"); // Mon, same week
        world.add(world.visible, "2024-06-03T08:00:00Z"); // earlier in June
        world.add(world.visible, "2024-05-31T08:00:00Z"); // May

        let view = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(view.reference.to_rfc3339(), "2024-06-13T00:30:00+02:00");
        assert_eq!(view.count(Bucket::Today), 1);
        assert_eq!(view.count(Bucket::Yesterday), 1);
        assert_eq!(view.count(Bucket::ThisWeek), 1);
        assert_eq!(view.count(Bucket::ThisMonth), 1);
        assert_eq!(view.count(Bucket::Earlier), 1);
    }

    #[test]
    fn test_rolling_names_are_unrecognized() {
        let world = World::new(PartitionScheme::CalendarAligned, "UTC", "2024-06-12T12:00:00Z");
        let view = world
            .service
            .bucketed_view(world.user, Some("last2d"))
            .unwrap();
        assert!(view.fallback);
        assert_eq!(view.selection, BucketSelection::All);
    }

    #[test]
    fn test_mark_today_uses_calendar_interval() {
        let world = World::new(PartitionScheme::CalendarAligned, "UTC", "2024-06-12T12:00:00Z");
        let this_morning = world.add(world.visible, "2024-06-12T01:00:00Z");
        // Within 24h but before local midnight: not "today" in this scheme
        let last_night = world.add(world.visible, "2024-06-11T23:00:00Z");

        let outcome = world.service.mark_bucket_read(world.user, "today").unwrap();
        assert_eq!(outcome.entries_marked, 1);
        assert_eq!(
            world.store.entry_status(this_morning).unwrap(),
            Some(EntryStatus::Read)
        );
        assert_eq!(
            world.store.entry_status(last_night).unwrap(),
            Some(EntryStatus::Unread)
        );
    }
}

mod invariants {
    use super::*;

    #[test]
    fn test_total_matches_direct_count() {
        let world = World::new(PartitionScheme::RollingWindow, "Asia/Kolkata", "2024-06-15T12:00:00Z");
        for published in [
            "2024-06-15T11:59:59Z",
            "2024-06-14T12:00:00Z",
            "2024-06-13T00:00:00Z",
            "2024-06-01T00:00:00Z",
            "2024-05-16T12:00:00Z",
            "2001-09-09T01:46:40Z",
        ] {
            world.add(world.visible, published);
        }
        world.add(world.hidden, "2024-06-15T10:00:00Z");

        for selector in [None, Some("all"), Some("today"), Some("bogus")] {
            let view = world.service.bucketed_view(world.user, selector).unwrap();
            let sum: u64 = view.buckets.iter().map(|b| b.unread_count).sum();
            assert_eq!(view.total_unread, sum);
            assert_eq!(view.total_unread, world.direct_unread_count());
            assert_eq!(view.total_unread, 6);
        }
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", "2024-06-15T12:00:00Z");
        world.add(world.visible, "2024-06-14T13:00:00Z");
        world.add(world.visible, "2024-06-14T14:00:00Z");

        let first = world.service.mark_bucket_read(world.user, "today").unwrap();
        let view_after_first = world.service.bucketed_view(world.user, Some("all")).unwrap();
        let second = world.service.mark_bucket_read(world.user, "today").unwrap();
        let view_after_second = world.service.bucketed_view(world.user, Some("all")).unwrap();

        assert_eq!(first.entries_marked, 2);
        assert_eq!(second.entries_marked, 0);
        assert_eq!(view_after_first, view_after_second);
    }

    #[test]
    fn test_mark_all_clears_every_bucket() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", "2024-06-15T12:00:00Z");
        world.add(world.visible, "2024-06-15T11:00:00Z");
        world.add(world.visible, "2024-06-01T11:00:00Z");
        world.add(world.visible, "1990-01-01T00:00:00Z");
        let hidden = world.add(world.hidden, "2024-06-15T11:00:00Z");

        let outcome = world.service.mark_bucket_read(world.user, "all").unwrap();
        assert_eq!(outcome.scope, MarkReadScope::AllGloballyVisible);
        assert_eq!(outcome.entries_marked, 3);

        let view = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(view.total_unread, 0);
        assert!(view.buckets.iter().all(|b| b.unread_count == 0));
        // Hidden feeds are untouched by the global primitive
        assert_eq!(
            world.store.entry_status(hidden).unwrap(),
            Some(EntryStatus::Unread)
        );
    }

    #[test]
    fn test_mark_bucket_clears_exactly_what_it_displays() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", "2024-06-15T12:00:00Z");
        world.add(world.visible, "2024-06-15T09:00:00Z");
        world.add(world.visible, "2024-06-12T09:00:00Z");
        world.add(world.visible, "2024-06-11T09:00:00Z");
        world.add(world.visible, "2024-05-01T09:00:00Z");
        world.add(world.hidden, "2024-06-12T09:00:00Z");

        let before = world
            .service
            .bucketed_view(world.user, Some("last7d"))
            .unwrap();
        let displayed = before.bucket(Bucket::Last7Days).unwrap().unread_count;

        let outcome = world.service.mark_bucket_read(world.user, "last7d").unwrap();
        assert_eq!(outcome.entries_marked, displayed);

        let after = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(after.count(Bucket::Last7Days), 0);
        assert_eq!(after.count(Bucket::Today), before.count(Bucket::Today));
        assert_eq!(after.count(Bucket::Earlier), before.count(Bucket::Earlier));
    }

    #[test]
    fn test_unrecognized_selector_displays_like_all() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", "2024-06-15T12:00:00Z");
        world.add(world.visible, "2024-06-15T09:00:00Z");
        world.add(world.visible, "2024-06-01T09:00:00Z");

        let all = world.service.bucketed_view(world.user, Some("all")).unwrap();
        let bogus = world.service.bucketed_view(world.user, Some("bogus")).unwrap();

        assert!(!all.fallback);
        assert!(bogus.fallback);
        assert_eq!(bogus.selection, all.selection);
        assert_eq!(bogus.buckets, all.buckets);
        assert_eq!(bogus.total_unread, all.total_unread);
    }

    #[test]
    fn test_hidden_feeds_never_counted() {
        let world = World::new(PartitionScheme::RollingWindow, "UTC", "2024-06-15T12:00:00Z");
        world.add(world.hidden, "2024-06-15T09:00:00Z");

        let view = world.service.bucketed_view(world.user, Some("all")).unwrap();
        assert_eq!(view.total_unread, 0);
        assert_eq!(view.displayed_entries().count(), 0);
    }

    #[test]
    fn test_sorting_follows_user_preference() {
        let store = Arc::new(SqliteEntryStore::in_memory().unwrap());
        let user = store
            .create_user("UTC", SortColumn::Title, SortDirection::Desc)
            .unwrap()
            .id;
        let feed = store.create_feed(user, "Feed", false).unwrap();
        let published = utc("2024-06-15T10:00:00Z");
        for title in ["alpha", "charlie", "bravo", "bravo"] {
            store
                .insert_entry(&NewEntry::new(user, feed, title, published))
                .unwrap();
        }
        let service = BucketService::new(
            store.clone(),
            store,
            Arc::new(FixedClock::new(utc("2024-06-15T12:00:00Z"))),
            PartitionScheme::RollingWindow,
        );

        let view = service.bucketed_view(user, None).unwrap();
        let ordered: Vec<(String, i64)> = view
            .displayed_entries()
            .map(|e| (e.title.clone(), e.id.get()))
            .collect();
        assert_eq!(
            ordered,
            vec![
                ("charlie".to_string(), 2),
                ("bravo".to_string(), 4),
                ("bravo".to_string(), 3),
                ("alpha".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_reference_is_truncated_to_seconds() {
        let store = Arc::new(SqliteEntryStore::in_memory().unwrap());
        let user = store
            .create_user("UTC", SortColumn::PublishedAt, SortDirection::Asc)
            .unwrap()
            .id;
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
            + chrono::Duration::milliseconds(750);
        let service = BucketService::new(
            store.clone(),
            store,
            Arc::new(FixedClock::new(now)),
            PartitionScheme::RollingWindow,
        );

        let view = service.bucketed_view(user, None).unwrap();
        assert_eq!(view.reference.to_rfc3339(), "2024-06-15T12:00:00+00:00");
        assert_eq!(
            view.bucket(Bucket::Today).unwrap().range.after,
            Some(utc("2024-06-14T12:00:00Z"))
        );
    }
}

/// Service behaviour against store doubles.
mod doubles {
    use super::*;
    use feedbuckets::models::{Entry, TimeRange, User};
    use feedbuckets::{Result, UserDirectory};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        UserLookup,
        Count,
        Fetch,
        MarkRange(TimeRange),
        MarkAll,
    }

    /// Records every call; optionally fails the nth count.
    struct RecordingStore {
        user: Option<User>,
        calls: Mutex<Vec<Call>>,
        fail_count_at: Option<usize>,
        fail_user_lookup: bool,
    }

    impl RecordingStore {
        fn with_user() -> Self {
            Self {
                user: Some(User::new(UserId::new(1), "UTC")),
                calls: Mutex::new(Vec::new()),
                fail_count_at: None,
                fail_user_lookup: false,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> usize {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call);
            calls.len()
        }

        fn counts(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| **c == Call::Count)
                .count()
        }
    }

    fn storage_error(operation: &str) -> Error {
        Error::OperationFailed {
            operation: operation.to_string(),
            cause: "connection reset".to_string(),
        }
    }

    impl EntryStore for RecordingStore {
        fn count_entries(&self, _query: &EntryQuery) -> Result<u64> {
            self.record(Call::Count);
            if self.fail_count_at == Some(self.counts()) {
                return Err(storage_error("count_entries"));
            }
            Ok(2)
        }

        fn fetch_entries(&self, _query: &EntryQuery) -> Result<Vec<Entry>> {
            self.record(Call::Fetch);
            Ok(Vec::new())
        }

        fn mark_entries_read_in_range(&self, _user_id: UserId, range: &TimeRange) -> Result<u64> {
            self.record(Call::MarkRange(*range));
            Ok(0)
        }

        fn mark_globally_visible_feeds_read(&self, _user_id: UserId) -> Result<u64> {
            self.record(Call::MarkAll);
            Ok(0)
        }
    }

    impl UserDirectory for RecordingStore {
        fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
            self.record(Call::UserLookup);
            if self.fail_user_lookup {
                return Err(storage_error("user_by_id"));
            }
            Ok(self.user.clone().filter(|u| u.id == id))
        }
    }

    fn service(store: &Arc<RecordingStore>, scheme: PartitionScheme) -> BucketService {
        BucketService::new(
            store.clone(),
            store.clone(),
            Arc::new(FixedClock::new(utc("2024-06-15T12:00:00Z"))),
            scheme,
        )
    }

    #[test]
    fn test_bogus_mutation_uses_global_primitive() {
        let store = Arc::new(RecordingStore::with_user());
        let outcome = service(&store, PartitionScheme::RollingWindow)
            .mark_bucket_read(UserId::new(1), "bogus")
            .unwrap();

        assert!(outcome.fallback);
        assert_eq!(store.calls(), vec![Call::UserLookup, Call::MarkAll]);
    }

    #[test]
    fn test_bucket_mutation_uses_range_primitive() {
        let store = Arc::new(RecordingStore::with_user());
        service(&store, PartitionScheme::RollingWindow)
            .mark_bucket_read(UserId::new(1), "last2d")
            .unwrap();

        let expected = TimeRange::between(utc("2024-06-13T12:00:00Z"), utc("2024-06-14T12:00:00Z"));
        assert_eq!(
            store.calls(),
            vec![Call::UserLookup, Call::MarkRange(expected)]
        );
    }

    #[test]
    fn test_earlier_mutation_is_open_ended() {
        let store = Arc::new(RecordingStore::with_user());
        service(&store, PartitionScheme::RollingWindow)
            .mark_bucket_read(UserId::new(1), "earlier")
            .unwrap();

        assert_eq!(
            store.calls()[1],
            Call::MarkRange(TimeRange::until(utc("2024-05-16T12:00:00Z")))
        );
    }

    #[test]
    fn test_view_counts_every_bucket_and_fetches_selected() {
        let store = Arc::new(RecordingStore::with_user());
        let view = service(&store, PartitionScheme::CalendarAligned)
            .bucketed_view(UserId::new(1), Some("yesterday"))
            .unwrap();

        assert_eq!(view.total_unread, 10);
        assert_eq!(store.counts(), 5);
        let fetches = store.calls().iter().filter(|c| **c == Call::Fetch).count();
        assert_eq!(fetches, 1);
    }

    #[test]
    fn test_count_failure_aborts_remaining_buckets() {
        let store = Arc::new(RecordingStore {
            fail_count_at: Some(3),
            ..RecordingStore::with_user()
        });
        let result = service(&store, PartitionScheme::RollingWindow)
            .bucketed_view(UserId::new(1), Some("all"));

        assert!(matches!(
            result,
            Err(Error::OperationFailed { ref operation, .. }) if operation == "count_entries"
        ));
        // Third count failed; nothing after it ran
        assert_eq!(store.counts(), 3);
        assert_eq!(store.calls().last(), Some(&Call::Count));
    }

    #[test]
    fn test_unknown_user_stops_before_bucket_work() {
        let store = Arc::new(RecordingStore {
            user: None,
            ..RecordingStore::with_user()
        });
        let svc = service(&store, PartitionScheme::RollingWindow);

        assert!(matches!(
            svc.bucketed_view(UserId::new(1), None),
            Err(Error::UserNotFound(_))
        ));
        assert!(matches!(
            svc.mark_bucket_read(UserId::new(1), "all"),
            Err(Error::UserNotFound(_))
        ));
        assert_eq!(store.calls(), vec![Call::UserLookup, Call::UserLookup]);
    }

    #[test]
    fn test_user_lookup_failure_propagates() {
        let store = Arc::new(RecordingStore {
            fail_user_lookup: true,
            ..RecordingStore::with_user()
        });
        let result = service(&store, PartitionScheme::RollingWindow)
            .mark_bucket_read(UserId::new(1), "today");

        assert!(matches!(result, Err(Error::OperationFailed { .. })));
        assert_eq!(store.calls(), vec![Call::UserLookup]);
    }
}
