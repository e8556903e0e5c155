use agenda_core::clock::Clock;
use agenda_core::date_range::DateRange;
use agenda_core::event::{Event, Occurrence};
use agenda_core::expand::expand;
use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(events: &[Event], range: &DateRange, clock: &impl Clock, json: bool) -> Result<()> {
    let mut occurrences = expand(events, range);

    // Sort by start time
    occurrences.sort_by(|a, b| a.start.cmp(&b.start));

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    println!("{}", range.to_string().dimmed());

    // Group occurrences by start day and print
    let today = clock.today();
    let mut current_date: Option<NaiveDate> = None;

    for occurrence in &occurrences {
        let date = occurrence.start_date();

        if current_date != Some(date) {
            println!();
            println!("{}", format_date_label(date, today).bold());
            current_date = Some(date);
        }

        println!("  {}", occurrence.render());
    }

    Ok(())
}

/// Count line used by the JSON-less summary of other commands
pub fn summary(occurrences: &[Occurrence]) -> String {
    let repeating = occurrences.iter().filter(|o| o.recurrence.is_repeating()).count();
    format!(
        "{} {} ({} from repeating events)",
        occurrences.len(),
        if occurrences.len() == 1 { "occurrence" } else { "occurrences" },
        repeating
    )
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    let diff = (date - today).num_days();
    match diff {
        -1 => "Yesterday".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
