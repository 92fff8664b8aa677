//! Time handling for dispatch
//!
//! - `Clock`: an injectable source of "now", so state machines stay testable
//! - `RelativeTime`: the human label shown next to a response ("just now")
//! - `Timezone`: formatting of timestamps for the office handling an incident

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Timestamp {timestamp} is after reference time {reference}")]
    FutureTimestamp {
        timestamp: String,
        reference: String,
    },
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jumps to an absolute time
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Coarse description of how long ago something happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeTime {
    JustNow,
    MinutesAgo(i64),
    HoursAgo(i64),
    DaysAgo(i64),
}

impl RelativeTime {
    /// Describes `timestamp` as seen from `reference`
    ///
    /// Anything under a minute, including small forward skews, is "just now".
    pub fn between(timestamp: DateTime<Utc>, reference: DateTime<Utc>) -> Self {
        let elapsed = reference - timestamp;
        if elapsed < Duration::minutes(1) {
            RelativeTime::JustNow
        } else if elapsed < Duration::hours(1) {
            RelativeTime::MinutesAgo(elapsed.num_minutes())
        } else if elapsed < Duration::days(1) {
            RelativeTime::HoursAgo(elapsed.num_hours())
        } else {
            RelativeTime::DaysAgo(elapsed.num_days())
        }
    }

    /// Strict variant that refuses timestamps ahead of the reference
    pub fn checked_between(
        timestamp: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Result<Self, TemporalError> {
        if timestamp > reference {
            return Err(TemporalError::FutureTimestamp {
                timestamp: timestamp.to_rfc3339(),
                reference: reference.to_rfc3339(),
            });
        }
        Ok(Self::between(timestamp, reference))
    }
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn unit(f: &mut fmt::Formatter<'_>, n: i64, singular: &str) -> fmt::Result {
            if n == 1 {
                write!(f, "1 {} ago", singular)
            } else {
                write!(f, "{} {}s ago", n, singular)
            }
        }

        match *self {
            RelativeTime::JustNow => f.write_str("just now"),
            RelativeTime::MinutesAgo(n) => unit(f, n, "minute"),
            RelativeTime::HoursAgo(n) => unit(f, n, "hour"),
            RelativeTime::DaysAgo(n) => unit(f, n, "day"),
        }
    }
}

/// Timezone wrapper for the office viewing an incident
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA zone name such as `America/Los_Angeles`
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(name.to_string()))
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Local calendar date of a UTC timestamp
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }

    /// Short form used in the communication log, e.g. `Oct 15, 3:42 PM`
    pub fn format_short(&self, utc: DateTime<Utc>) -> String {
        self.to_local(utc).format("%b %-d, %-I:%M %p").to_string()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}
