//! Reference-instant clock and timezone resolution.
//!
//! The reference instant is "now" expressed in the user's timezone. It is
//! read once per request so that every bucket of that request is derived
//! from the same moment.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Source of the current instant.
///
/// Implementations must be cheap to call; services call [`Clock::now`]
/// exactly once per request.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Returns the current instant localized to `tz`.
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&tz)
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and reproducible CLI runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock that always returns `instant`.
    #[must_use]
    pub fn new<Z: TimeZone>(instant: DateTime<Z>) -> Self {
        Self {
            instant: instant.with_timezone(&Utc),
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Resolves an IANA timezone name, falling back to UTC.
///
/// An empty or unknown name is logged and treated as UTC rather than failing
/// the request.
#[must_use]
pub fn resolve_timezone(name: &str) -> Tz {
    let name = name.trim();
    if name.is_empty() {
        return Tz::UTC;
    }
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = name, "Unknown timezone, falling back to UTC");
        metrics::counter!("timezone_fallback_total").increment(1);
        Tz::UTC
    })
}
