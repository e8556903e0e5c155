//! Calendar event types.
//!
//! An [`Event`] is a stored record in its validated form. An [`Occurrence`]
//! is one concrete instance of an event inside a queried window; it is
//! derived on every expansion and never persisted.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::recurrence::Recurrence;
use crate::week::Week;

/// A stored calendar event. Timestamps are local wall-clock values with no
/// timezone attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl Event {
    /// Difference in calendar days between the end date and the start date.
    /// Negative when the event ends before it starts.
    pub fn day_span(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days()
    }
}

/// One concrete instance of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// `origin_id` for non-repeating events, `{origin_id}_{YYYY-MM-DD}` otherwise
    pub id: String,
    pub origin_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub recurrence: Recurrence,
}

impl Occurrence {
    /// The event itself, unshifted and with its id unchanged.
    pub fn original(event: &Event) -> Self {
        Occurrence {
            id: event.id.clone(),
            origin_id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            recurrence: event.recurrence,
        }
    }

    /// A generated instance of a repeating event.
    pub fn generated(event: &Event, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Occurrence {
            id: format!("{}_{}", event.id, start.format("%Y-%m-%d")),
            origin_id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start,
            end,
            recurrence: event.recurrence,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.overlaps(self.start, self.end)
    }

    /// Column offset and number of columns this occurrence covers in `week`.
    pub fn visible_span(&self, week: &Week) -> (usize, usize) {
        week.visible_columns(self.start_date(), self.end_date())
    }
}

impl std::fmt::Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
