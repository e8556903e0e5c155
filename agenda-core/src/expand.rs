//! Expansion of stored events into concrete occurrences within a window.

use chrono::TimeDelta;

use crate::date_range::DateRange;
use crate::event::{Event, Occurrence};
use crate::record::RawEvent;

/// Expand `events` into the occurrences that touch `range`.
///
/// - Non-repeating events are emitted whole, with their id unchanged, when
///   their interval overlaps the range.
/// - Repeating events are fast-forwarded to the first start at or after
///   `range.start`, then emitted once per step while the start is within
///   the range. Each instance keeps the original clock times and day span.
///
/// An inverted range yields nothing. Output follows input order, and each
/// event's instances are chronological, but callers should not rely on it.
#[tracing::instrument(skip(events), fields(events = events.len()))]
pub fn expand(events: &[Event], range: &DateRange) -> Vec<Occurrence> {
    if !range.is_valid() {
        tracing::debug!("Inverted range, nothing to expand");
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    for event in events {
        if event.recurrence.is_repeating() {
            expand_repeating(event, range, &mut occurrences);
        } else if range.overlaps(event.start, event.end) {
            occurrences.push(Occurrence::original(event));
        }
    }

    tracing::debug!(count = occurrences.len(), "Expanded occurrences");
    occurrences
}

/// Validate raw records, skipping malformed ones, then [`expand`].
pub fn expand_records(records: &[RawEvent], range: &DateRange) -> Vec<Occurrence> {
    let events: Vec<Event> = records.iter().filter_map(RawEvent::to_event).collect();
    expand(&events, range)
}

fn expand_repeating(event: &Event, range: &DateRange, out: &mut Vec<Occurrence>) {
    let rule = event.recurrence;
    let Some(day_span) = TimeDelta::try_days(event.day_span()) else {
        return;
    };
    let end_time = event.end.time();

    let Some(mut n) = rule.first_index_at_or_after(event.start, range.start) else {
        return;
    };

    while let Some(start) = rule.nth_start(event.start, n) {
        if start > range.end {
            break;
        }

        let Some(end_date) = start.date().checked_add_signed(day_span) else {
            break;
        };
        out.push(Occurrence::generated(event, start, end_date.and_time(end_time)));

        let Some(next) = n.checked_add(1) else {
            break;
        };
        n = next;
    }
}
