use agenda_core::day::occurrences_for_day;
use agenda_core::event::{Event, Occurrence};
use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::commands::expand::summary;
use crate::render::Render;

pub fn run(events: &[Event], date: NaiveDate, json: bool) -> Result<()> {
    let on_day = occurrences_for_day(events, date);

    if json {
        println!("{}", serde_json::to_string_pretty(&on_day)?);
    } else {
        println!("{}", render_day(date, &on_day));
    }

    Ok(())
}

fn render_day(date: NaiveDate, on_day: &[Occurrence]) -> String {
    let mut lines = vec![date.format("%A %B %-d, %Y").to_string().bold().to_string()];

    if on_day.is_empty() {
        lines.push(format!("  {}", "Nothing scheduled".dimmed()));
        return lines.join("\n");
    }

    for occurrence in on_day {
        lines.push(format!("  {}", occurrence.render()));
    }
    lines.push(summary(on_day).dimmed().to_string());

    lines.join("\n")
}
