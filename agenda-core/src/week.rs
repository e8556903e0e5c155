//! Monday-first calendar weeks.

use chrono::{NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::DAYS_PER_WEEK;
use crate::date_range::{last_day_of_month, DateRange};
use crate::error::{AgendaError, AgendaResult};

/// Seven consecutive days starting on a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    /// The week that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Week {
            start: date.week(Weekday::Mon).first_day(),
        }
    }

    /// Weeks of a month grid: from the week holding the 1st through the
    /// week holding the last day.
    pub fn grid_for_month(year: i32, month: u32) -> AgendaResult<Vec<Week>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AgendaError::InvalidDate(format!("{}-{:02}", year, month)))?;
        let last = last_day_of_month(first)
            .ok_or_else(|| AgendaError::InvalidDate(format!("{}-{:02}", year, month)))?;

        let mut weeks = Vec::new();
        let mut week = Week::containing(first);
        while week.start <= last {
            weeks.push(week);
            week = week.next();
        }
        Ok(weeks)
    }

    /// Monday
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday
    pub fn end(&self) -> NaiveDate {
        self.start + TimeDelta::days(DAYS_PER_WEEK as i64 - 1)
    }

    pub fn next(&self) -> Week {
        Week {
            start: self.start + TimeDelta::days(DAYS_PER_WEEK as i64),
        }
    }

    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.start + TimeDelta::days(i as i64))
    }

    /// Monday 00:00:00 through Sunday 23:59:59.
    pub fn range(&self) -> DateRange {
        DateRange::for_dates(self.start, self.end())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Column index of `date`, clamped into 0..=6.
    pub fn day_offset(&self, date: NaiveDate) -> usize {
        let offset = (date - self.start).num_days().clamp(0, DAYS_PER_WEEK as i64 - 1);
        offset as usize
    }

    /// First column and column count of an interval clipped to this week.
    ///
    /// The span is at least one column and never runs past Sunday, so an
    /// interval that ends before it starts still occupies its start column.
    pub fn visible_columns(&self, start: NaiveDate, end: NaiveDate) -> (usize, usize) {
        let first = start.max(self.start);
        let last = end.min(self.end());

        let column = self.day_offset(first);
        let span = usize::try_from((last - first).num_days() + 1)
            .unwrap_or(1)
            .max(1);

        (column, span.min(DAYS_PER_WEEK - column))
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Week of {}", self.start.format("%Y-%m-%d"))
    }
}
