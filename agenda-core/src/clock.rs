//! Injected "current date" capability.
//!
//! Nothing in this crate reads the host clock directly. Callers pass a
//! [`Clock`] so that "today" is defined by the application and can be
//! pinned in tests.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub trait Clock {
    /// Current wall-clock time in the application's timezone.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Host clock, converted into a fixed application timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        SystemClock { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock { tz: Tz::UTC }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Midnight of the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        FixedClock(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
