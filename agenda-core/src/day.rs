//! Exact-day membership of occurrences.
//!
//! Expansion admits occurrences by interval overlap with the whole query
//! window and never clips them, so per-day views need their own test of
//! which dates an occurrence actually covers.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};

use crate::date_range::DateRange;
use crate::event::{Event, Occurrence};
use crate::expand::expand;

/// Whether `occurrence` covers `date`.
///
/// An occurrence covers every date from its start date to its end date.
/// One that ends before it starts covers only its start date.
pub fn covers(occurrence: &Occurrence, date: NaiveDate) -> bool {
    let first = occurrence.start_date();
    let last = occurrence.end_date().max(first);
    first <= date && date <= last
}

/// Occurrences covering `date`, earliest start first. Ties keep input order.
pub fn occurrences_on(date: NaiveDate, occurrences: &[Occurrence]) -> Vec<&Occurrence> {
    let mut on_day: Vec<&Occurrence> = occurrences.iter().filter(|o| covers(o, date)).collect();
    on_day.sort_by_key(|o| o.start);
    on_day
}

/// Expand `events` and keep the occurrences covering `date`, earliest first.
///
/// Repeating instances are only emitted when they start inside the window,
/// so the window opens as many days before `date` as the longest repeating
/// event spans. An overnight instance that began the day before is kept.
pub fn occurrences_for_day(events: &[Event], date: NaiveDate) -> Vec<Occurrence> {
    let lookback = events
        .iter()
        .filter(|e| e.recurrence.is_repeating())
        .map(Event::day_span)
        .max()
        .unwrap_or(0)
        .max(0);

    let from = TimeDelta::try_days(lookback)
        .and_then(|span| date.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);

    let mut on_day: Vec<Occurrence> = expand(events, &DateRange::for_dates(from, date))
        .into_iter()
        .filter(|o| covers(o, date))
        .collect();
    on_day.sort_by_key(|o| o.start);
    on_day
}

/// Number of occurrences covering each date of `range`.
pub fn counts_by_day(range: &DateRange, occurrences: &[Occurrence]) -> BTreeMap<NaiveDate, usize> {
    range
        .days()
        .map(|day| (day, occurrences.iter().filter(|o| covers(o, day)).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Recurrence;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn occ(id: &str, start: &str, end: &str) -> Occurrence {
        Occurrence {
            id: id.to_string(),
            origin_id: id.to_string(),
            title: id.to_string(),
            description: None,
            start: NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M").unwrap(),
            end: NaiveDateTime::parse_from_str(end, "%Y-%m-%dT%H:%M").unwrap(),
            recurrence: Recurrence::None,
        }
    }

    #[test]
    fn test_occurrences_on_sorted_by_start() {
        let occurrences = vec![
            occ("late", "2024-06-03T18:00", "2024-06-03T19:00"),
            occ("multi", "2024-06-01T09:00", "2024-06-04T09:00"),
            occ("other-day", "2024-06-05T09:00", "2024-06-05T10:00"),
            occ("early", "2024-06-03T07:00", "2024-06-03T08:00"),
        ];

        let ids: Vec<&str> = occurrences_on(date("2024-06-03"), &occurrences)
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["multi", "early", "late"]);
    }

    #[test]
    fn test_inverted_occurrence_covers_start_date_only() {
        let odd = occ("odd", "2024-06-10T00:00", "2024-06-08T00:00");
        assert!(covers(&odd, date("2024-06-10")));
        assert!(!covers(&odd, date("2024-06-09")));
        assert!(!covers(&odd, date("2024-06-08")));
    }

    #[test]
    fn test_repeating_overnight_event_shows_on_following_day() {
        let events = vec![Event {
            id: "night".to_string(),
            title: "Night shift".to_string(),
            description: None,
            start: NaiveDateTime::parse_from_str("2024-06-03T22:00", "%Y-%m-%dT%H:%M").unwrap(),
            end: NaiveDateTime::parse_from_str("2024-06-04T06:00", "%Y-%m-%dT%H:%M").unwrap(),
            recurrence: Recurrence::Weekly,
        }];

        let tuesday = occurrences_for_day(&events, date("2024-06-11"));
        let ids: Vec<&str> = tuesday.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["night_2024-06-10"]);

        let monday = occurrences_for_day(&events, date("2024-06-10"));
        assert_eq!(monday.len(), 1);

        assert!(occurrences_for_day(&events, date("2024-06-12")).is_empty());
    }

    #[test]
    fn test_occurrences_for_day_keeps_single_events_covering_date() {
        let events = vec![
            Event {
                id: "trip".to_string(),
                title: "Trip".to_string(),
                description: None,
                start: NaiveDateTime::parse_from_str("2024-06-01T08:00", "%Y-%m-%dT%H:%M").unwrap(),
                end: NaiveDateTime::parse_from_str("2024-06-05T20:00", "%Y-%m-%dT%H:%M").unwrap(),
                recurrence: Recurrence::None,
            },
            Event {
                id: "gone".to_string(),
                title: "Earlier".to_string(),
                description: None,
                start: NaiveDateTime::parse_from_str("2024-06-01T08:00", "%Y-%m-%dT%H:%M").unwrap(),
                end: NaiveDateTime::parse_from_str("2024-06-01T09:00", "%Y-%m-%dT%H:%M").unwrap(),
                recurrence: Recurrence::None,
            },
        ];

        let ids: Vec<String> = occurrences_for_day(&events, date("2024-06-03"))
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["trip".to_string()]);
    }

    #[test]
    fn test_counts_by_day() {
        let occurrences = vec![
            occ("a", "2024-06-01T09:00", "2024-06-03T09:00"),
            occ("b", "2024-06-02T09:00", "2024-06-02T10:00"),
        ];
        let range = DateRange::for_dates(date("2024-06-01"), date("2024-06-04"));

        let counts = counts_by_day(&range, &occurrences);
        let values: Vec<usize> = counts.values().copied().collect();
        assert_eq!(values, vec![1, 2, 1, 0]);
    }
}
