//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding the specified number of hours.
    ///
    /// Negative values subtract hours.
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// Creates a new timestamp by subtracting a duration.
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration)
    }

    /// Creates a timestamp from Unix milliseconds, or `None` when the
    /// value is outside chrono's representable range.
    pub fn try_from_unix_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Out-of-range values fall back to the Unix epoch and are logged.
    pub fn from_unix_millis(millis: i64) -> Self {
        Self::try_from_unix_millis(millis).unwrap_or_else(|| {
            debug!(millis, "Unix milliseconds out of range, using epoch");
            Self(DateTime::<Utc>::default())
        })
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Hour of day (0-23, UTC).
    pub fn hour_of_day(&self) -> u32 {
        self.0.hour()
    }

    /// Day of week (0 = Sunday .. 6 = Saturday, UTC).
    pub fn day_of_week(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Calendar day as (year, ordinal day), UTC.
    pub fn calendar_day(&self) -> (i32, u32) {
        (self.0.year(), self.0.ordinal())
    }

    /// Calendar hour as (year, ordinal day, hour), UTC.
    pub fn calendar_hour(&self) -> (i32, u32, u32) {
        (self.0.year(), self.0.ordinal(), self.0.hour())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
