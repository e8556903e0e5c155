//! Inclusive date-time windows used to query and filter events.

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::constants::DEFAULT_RANGE_DAYS;
use crate::error::{AgendaError, AgendaResult};

/// Inclusive window `[start, end]` of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateRange { start, end }
    }

    /// From the start of `from` to the end of `to`.
    pub fn for_dates(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(from),
            end: end_of_day(to),
        }
    }

    pub fn for_day(date: NaiveDate) -> Self {
        Self::for_dates(date, date)
    }

    /// Every day of the given calendar month.
    pub fn for_month(year: i32, month: u32) -> AgendaResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AgendaError::InvalidDate(format!("{}-{:02}", year, month)))?;
        let last = last_day_of_month(first)
            .ok_or_else(|| AgendaError::InvalidDate(format!("{}-{:02}", year, month)))?;
        Ok(Self::for_dates(first, last))
    }

    /// Build a range from optional `YYYY-MM-DD` arguments.
    /// Missing bounds default to ±DEFAULT_RANGE_DAYS around the clock's today.
    pub fn from_args(from: Option<&str>, to: Option<&str>, clock: &impl Clock) -> AgendaResult<Self> {
        let today = clock.today();

        let from_date = match from {
            Some(s) => parse_date(s)?,
            None => today - TimeDelta::days(DEFAULT_RANGE_DAYS),
        };

        let to_date = match to {
            Some(s) => parse_date(s)?,
            None => today + TimeDelta::days(DEFAULT_RANGE_DAYS),
        };

        Ok(Self::for_dates(from_date, to_date))
    }

    /// A range whose start lies after its end selects nothing.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whether `[start, end]` touches this range.
    ///
    /// This is the raw comparison `end >= self.start && start <= self.end`;
    /// an interval with `end < start` is not normalized first.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        end >= self.start && start <= self.end
    }

    /// Calendar dates touched by the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.end.date();
        self.start
            .date()
            .iter_days()
            .take_while(move |d| *d <= last)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| start_of_day(date))
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> AgendaResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        AgendaError::InvalidDate(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

pub(crate) fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}
