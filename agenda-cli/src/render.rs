//! Text rendering for agenda-core types.
//!
//! Extension traits that turn occurrences and layouts into colored terminal
//! lines using owo_colors. This is a dump of the computed data, not a grid.

use agenda_core::event::Occurrence;
use agenda_core::layout::{Placement, WeekLayout};
use agenda_core::month::MonthView;
use owo_colors::OwoColorize;

/// Plain-text summary of a computed value, one or more colored lines.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let time = if self.start_date() == self.end_date() {
            format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
        } else {
            format!("{} → {}", self.start.format("%H:%M"), self.end.format("%b %-d %H:%M"))
        };

        let repeat = if self.recurrence.is_repeating() {
            format!(" ({})", self.recurrence).cyan().to_string()
        } else {
            String::new()
        };

        format!("{:>13} {}{} {}", time, self.title, repeat, format!("[{}]", self.id).dimmed())
    }
}

/// Day names for a run of columns, e.g. "Mon" or "Mon-Wed"
fn column_label(layout: &WeekLayout, placement: &Placement) -> String {
    let days = layout.week.days();
    let first = days[placement.column_start].format("%a");
    if placement.column_span == 1 {
        first.to_string()
    } else {
        let last = days[placement.column_start + placement.column_span - 1].format("%a");
        format!("{}-{}", first, last)
    }
}

impl Render for WeekLayout {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.week.to_string().bold(),
            format!("({} - {})", self.week.start().format("%b %-d"), self.week.end().format("%b %-d")).dimmed()
        )];

        if self.placements.is_empty() {
            lines.push(format!("   {}", "No events".dimmed()));
        }

        let mut placements: Vec<&Placement> = self.placements.iter().collect();
        placements.sort_by_key(|p| (p.row, p.column_start));

        for placement in placements {
            lines.push(format!(
                "   {} {:<7} {}",
                format!("row {}", placement.row).dimmed(),
                column_label(self, placement),
                placement.occurrence.title
            ));
        }

        let days = self.week.days();
        let hidden: Vec<String> = self
            .overflow
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| format!("{} +{}", days[column].format("%a"), count))
            .collect();

        if !hidden.is_empty() {
            lines.push(format!("   {} {}", "hidden".yellow(), hidden.join("  ").yellow()));
        }

        lines.join("\n")
    }
}

impl Render for MonthView {
    fn render(&self) -> String {
        let header = format!("📅 {}-{:02}", self.year, self.month);
        let mut blocks = vec![header.bold().to_string()];
        blocks.extend(self.weeks.iter().map(Render::render));
        blocks.join("\n\n")
    }
}
