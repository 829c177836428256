//! Time source used by the timestamp version factories

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Source of the current local time.
///
/// Timestamp versions encode the moment they were created, so anything that
/// mints one takes a clock rather than reading the system time directly.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: NaiveDateTime,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        FixedClock { at }
    }

    /// Freeze at the local-time view of a timezone-aware instant
    pub fn from_datetime<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        FixedClock {
            at: at.naive_local(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }
}
