//! A month grid: one expansion for the visible range, one layout per week.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_range::DateRange;
use crate::error::{AgendaError, AgendaResult};
use crate::event::{Event, Occurrence};
use crate::expand::expand;
use crate::layout::{layout, WeekLayout};
use crate::week::Week;

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// First Monday of the grid through its last Sunday
    pub range: DateRange,
    pub occurrences: Vec<Occurrence>,
    pub weeks: Vec<WeekLayout>,
}

impl MonthView {
    /// Expand `events` over the whole grid and lay out each of its weeks.
    pub fn build(events: &[Event], year: i32, month: u32, row_capacity: usize) -> AgendaResult<Self> {
        let grid = Week::grid_for_month(year, month)?;
        let (Some(first), Some(last)) = (grid.first(), grid.last()) else {
            return Err(AgendaError::InvalidDate(format!("{}-{:02}", year, month)));
        };
        let range = DateRange::for_dates(first.start(), last.end());

        let occurrences = expand(events, &range);

        let weeks = grid
            .iter()
            .map(|week| {
                let week_range = week.range();
                let in_week: Vec<Occurrence> = occurrences
                    .iter()
                    .filter(|o| o.overlaps(&week_range))
                    .cloned()
                    .collect();
                layout(week, &in_week, row_capacity)
            })
            .collect::<AgendaResult<Vec<_>>>()?;

        Ok(MonthView {
            year,
            month,
            range,
            occurrences,
            weeks,
        })
    }

    pub fn week_for(&self, date: NaiveDate) -> Option<&WeekLayout> {
        self.weeks.iter().find(|w| w.week.contains(date))
    }

    /// Whether `date` belongs to the month itself rather than the grid padding.
    pub fn in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}
