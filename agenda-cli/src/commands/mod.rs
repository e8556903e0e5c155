pub mod day;
pub mod expand;
pub mod month;
pub mod week;
