//! Packing of occurrences into the rows of a week grid.
//!
//! Each week shows at most `row_capacity` bars. Occurrences are placed
//! greedily, longest visible span first, into the lowest row whose columns
//! are still free. Whatever does not fit is counted in `overflow` for every
//! day it would have covered, so the grid can show "+N" for that day.

use serde::Serialize;

use crate::constants::DAYS_PER_WEEK;
use crate::error::{AgendaError, AgendaResult};
use crate::event::Occurrence;
use crate::week::Week;

/// A bar in the week grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub occurrence: Occurrence,
    /// 0 (Monday) to 6 (Sunday)
    pub column_start: usize,
    /// Always at least 1, and `column_start + column_span <= 7`
    pub column_span: usize,
    pub row: usize,
}

impl Placement {
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.column_start..self.column_start + self.column_span
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout {
    pub week: Week,
    pub placements: Vec<Placement>,
    /// Per day, how many occurrences could not get a bar
    pub overflow: [u32; DAYS_PER_WEEK],
}

impl WeekLayout {
    pub fn hidden_on(&self, column: usize) -> u32 {
        self.overflow.get(column).copied().unwrap_or(0)
    }

    pub fn total_overflow(&self) -> u32 {
        self.overflow.iter().sum()
    }

    pub fn placements_in_row(&self, row: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.row == row)
    }

    /// The placement covering `column` in `row`, if any.
    pub fn placement_at(&self, row: usize, column: usize) -> Option<&Placement> {
        self.placements_in_row(row)
            .find(|p| p.columns().contains(&column))
    }
}

/// Occupied columns of one row, one bit per day.
#[derive(Debug, Clone, Copy, Default)]
struct RowOccupancy(u8);

impl RowOccupancy {
    fn mask(column_start: usize, column_span: usize) -> u8 {
        (((1u16 << column_span) - 1) << column_start) as u8
    }

    fn is_free(self, mask: u8) -> bool {
        self.0 & mask == 0
    }

    fn occupy(&mut self, mask: u8) {
        self.0 |= mask;
    }
}

/// Lay out the occurrences of one week.
///
/// `occurrences` should already be limited to those overlapping the week.
/// Ties in visible span keep their input order. Fails only when
/// `row_capacity` is zero.
#[tracing::instrument(skip(week, occurrences), fields(week = %week, occurrences = occurrences.len()))]
pub fn layout(week: &Week, occurrences: &[Occurrence], row_capacity: usize) -> AgendaResult<WeekLayout> {
    if row_capacity == 0 {
        return Err(AgendaError::InvalidRowCapacity(row_capacity));
    }

    let mut ordered: Vec<(&Occurrence, usize, usize)> = occurrences
        .iter()
        .map(|occ| {
            let (column_start, column_span) = occ.visible_span(week);
            (occ, column_start, column_span)
        })
        .collect();
    // sort_by is stable
    ordered.sort_by(|a, b| b.2.cmp(&a.2));

    // Each occurrence fills at most one new row, so rows past that count stay empty
    let row_count = row_capacity.min(occurrences.len());
    let mut rows = vec![RowOccupancy::default(); row_count];
    let mut placements =
        Vec::with_capacity(occurrences.len().min(row_count.saturating_mul(DAYS_PER_WEEK)));
    let mut overflow = [0u32; DAYS_PER_WEEK];

    for (occurrence, column_start, column_span) in ordered {
        let mask = RowOccupancy::mask(column_start, column_span);

        match rows.iter().position(|row| row.is_free(mask)) {
            Some(row) => {
                rows[row].occupy(mask);
                placements.push(Placement {
                    occurrence: occurrence.clone(),
                    column_start,
                    column_span,
                    row,
                });
            }
            None => {
                for count in &mut overflow[column_start..column_start + column_span] {
                    *count += 1;
                }
            }
        }
    }

    tracing::debug!(
        placed = placements.len(),
        hidden = overflow.iter().sum::<u32>(),
        "Week laid out"
    );

    Ok(WeekLayout {
        week: *week,
        placements,
        overflow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Recurrence;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32) -> NaiveDateTime {
        d.and_hms_opt(h, 0, 0).unwrap()
    }

    fn occ(id: &str, start: NaiveDate, end: NaiveDate) -> Occurrence {
        Occurrence {
            id: id.to_string(),
            origin_id: id.to_string(),
            title: id.to_uppercase(),
            description: None,
            start: at(start, 9),
            end: at(end, 17),
            recurrence: Recurrence::None,
        }
    }

    fn june_week() -> Week {
        Week::containing(date(2024, 6, 3))
    }

    #[test]
    fn test_fourth_full_week_event_overflows_every_day() {
        let week = june_week();
        let occurrences: Vec<Occurrence> = (0..4)
            .map(|i| occ(&format!("e{}", i), date(2024, 6, 3), date(2024, 6, 9)))
            .collect();

        let result = layout(&week, &occurrences, 3).unwrap();

        assert_eq!(result.placements.len(), 3);
        let rows: Vec<usize> = result.placements.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert!(result.placements.iter().all(|p| p.column_start == 0 && p.column_span == 7));
        assert_eq!(result.overflow, [1; 7]);
        // Stable order: the last input is the one left out
        assert!(result.placements.iter().all(|p| p.occurrence.id != "e3"));
    }

    #[test]
    fn test_longer_events_placed_first() {
        let week = june_week();
        let occurrences = vec![
            occ("short", date(2024, 6, 4), date(2024, 6, 4)),
            occ("long", date(2024, 6, 3), date(2024, 6, 6)),
        ];

        let result = layout(&week, &occurrences, 1).unwrap();

        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].occurrence.id, "long");
        assert_eq!(result.overflow, [0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_non_overlapping_events_share_a_row() {
        let week = june_week();
        let occurrences = vec![
            occ("mon-tue", date(2024, 6, 3), date(2024, 6, 4)),
            occ("thu", date(2024, 6, 6), date(2024, 6, 6)),
            occ("tue-wed", date(2024, 6, 4), date(2024, 6, 5)),
        ];

        let result = layout(&week, &occurrences, 3).unwrap();

        let row_of = |id: &str| {
            result
                .placements
                .iter()
                .find(|p| p.occurrence.id == id)
                .map(|p| p.row)
        };
        assert_eq!(row_of("mon-tue"), Some(0));
        assert_eq!(row_of("tue-wed"), Some(1));
        assert_eq!(row_of("thu"), Some(0));
        assert_eq!(result.total_overflow(), 0);
        assert_eq!(result.placement_at(0, 3).map(|p| p.occurrence.id.as_str()), Some("thu"));
        assert!(result.placement_at(1, 0).is_none());
    }

    #[test]
    fn test_spans_clip_to_week_edges() {
        let week = june_week();
        let occurrences = vec![
            occ("from-last-week", date(2024, 5, 29), date(2024, 6, 4)),
            occ("into-next-week", date(2024, 6, 8), date(2024, 6, 12)),
        ];

        let result = layout(&week, &occurrences, 3).unwrap();
        let spans: Vec<(usize, usize)> = result
            .placements
            .iter()
            .map(|p| (p.column_start, p.column_span))
            .collect();

        assert_eq!(spans, vec![(0, 2), (5, 2)]);
        assert!(result.placements.iter().all(|p| p.row == 0));
    }

    #[test]
    fn test_end_before_start_takes_one_column() {
        let week = june_week();
        let occurrences = vec![occ("odd", date(2024, 6, 7), date(2024, 6, 5))];

        let result = layout(&week, &occurrences, 3).unwrap();
        assert_eq!(result.placements[0].column_start, 4);
        assert_eq!(result.placements[0].column_span, 1);
    }

    #[test]
    fn test_overflow_counts_only_spanned_days() {
        let week = june_week();
        let occurrences = vec![
            occ("a", date(2024, 6, 5), date(2024, 6, 6)),
            occ("b", date(2024, 6, 5), date(2024, 6, 6)),
            occ("c", date(2024, 6, 6), date(2024, 6, 7)),
        ];

        let result = layout(&week, &occurrences, 2).unwrap();
        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.overflow, [0, 0, 0, 1, 1, 0, 0]);
        assert_eq!(result.hidden_on(3), 1);
        assert_eq!(result.hidden_on(9), 0);
    }

    #[test]
    fn test_zero_row_capacity_is_rejected() {
        let result = layout(&june_week(), &[], 0);
        assert!(matches!(result, Err(AgendaError::InvalidRowCapacity(0))));
    }

    #[test]
    fn test_huge_row_capacity_places_everything() {
        let week = june_week();
        let occurrences: Vec<Occurrence> = (0..4)
            .map(|i| occ(&format!("e{}", i), date(2024, 6, 3), date(2024, 6, 9)))
            .collect();

        let result = layout(&week, &occurrences, usize::MAX).unwrap();
        let rows: Vec<usize> = result.placements.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert_eq!(result.total_overflow(), 0);

        assert!(layout(&week, &[], usize::MAX).unwrap().placements.is_empty());
    }

    #[test]
    fn test_empty_week() {
        let result = layout(&june_week(), &[], 3).unwrap();
        assert!(result.placements.is_empty());
        assert_eq!(result.total_overflow(), 0);
    }

    fn arb_occurrences() -> impl Strategy<Value = Vec<Occurrence>> {
        prop::collection::vec((-3i64..10, -1i64..9), 0..25).prop_map(|spans| {
            let monday = date(2024, 6, 3);
            spans
                .into_iter()
                .enumerate()
                .map(|(i, (offset, len))| {
                    let start = monday + TimeDelta::days(offset);
                    occ(&format!("o{}", i), start, start + TimeDelta::days(len))
                })
                // keep only what the caller's pre-filter would pass
                .filter(|o| june_week().range().overlaps(o.start, o.end))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_every_occurrence_placed_or_counted(
            occurrences in arb_occurrences(),
            capacity in 1usize..5,
        ) {
            let week = june_week();
            let result = layout(&week, &occurrences, capacity).unwrap();

            let mut hidden_days = 0u32;
            let mut hidden = 0usize;
            for o in &occurrences {
                let placed = result.placements.iter().filter(|p| p.occurrence.id == o.id).count();
                prop_assert!(placed <= 1);
                if placed == 0 {
                    hidden += 1;
                    hidden_days += o.visible_span(&week).1 as u32;
                }
            }

            prop_assert_eq!(result.placements.len() + hidden, occurrences.len());
            prop_assert_eq!(result.total_overflow(), hidden_days);
        }

        #[test]
        fn prop_rows_never_overlap(
            occurrences in arb_occurrences(),
            capacity in 1usize..5,
        ) {
            let result = layout(&june_week(), &occurrences, capacity).unwrap();

            for (i, a) in result.placements.iter().enumerate() {
                prop_assert!(a.row < capacity);
                prop_assert!(a.column_start + a.column_span <= DAYS_PER_WEEK);
                for b in &result.placements[i + 1..] {
                    if a.row == b.row {
                        let disjoint = a.columns().end <= b.column_start
                            || b.columns().end <= a.column_start;
                        prop_assert!(disjoint, "{} and {} collide in row {}", a.occurrence.id, b.occurrence.id, a.row);
                    }
                }
            }
        }
    }
}
