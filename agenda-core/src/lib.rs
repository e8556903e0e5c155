//! Core of the agenda calendar.
//!
//! - [`expand`](expand::expand) turns stored events, some repeating, into the
//!   concrete occurrences touching a date range.
//! - [`layout`](layout::layout) packs one week's occurrences into a fixed
//!   number of rows and counts what does not fit, per day.
//!
//! Both are pure functions of their inputs. "Today" is never read from the
//! host clock here; it comes from a [`Clock`](clock::Clock).

pub mod clock;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod day;
pub mod error;
pub mod event;
pub mod expand;
pub mod layout;
pub mod month;
pub mod record;
pub mod recurrence;
pub mod week;

pub use event::{Event, Occurrence};
pub use expand::expand;
pub use layout::{layout, Placement, WeekLayout};
pub use recurrence::Recurrence;
