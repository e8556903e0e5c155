use agenda_core::event::Event;
use agenda_core::month::MonthView;
use anyhow::Result;

use crate::render::Render;

pub fn run(events: &[Event], year: i32, month: u32, rows: usize, json: bool) -> Result<()> {
    let view = MonthView::build(events, year, month, rows)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.render());
    }

    Ok(())
}
