use agenda_core::event::Event;
use agenda_core::expand::expand;
use agenda_core::layout::layout;
use agenda_core::week::Week;
use anyhow::Result;

use crate::render::Render;

pub fn run(events: &[Event], week: &Week, rows: usize, json: bool) -> Result<()> {
    let range = week.range();
    let occurrences: Vec<_> = expand(events, &range)
        .into_iter()
        .filter(|o| o.overlaps(&range))
        .collect();

    let week_layout = layout(week, &occurrences, rows)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&week_layout)?);
    } else {
        println!("{}", week_layout.render());
    }

    Ok(())
}
