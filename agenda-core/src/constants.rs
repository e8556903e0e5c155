/// Number of days either side of today used when a range bound is omitted
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Event bars shown per week before the rest collapse into "+N"
pub const DEFAULT_ROW_CAPACITY: usize = 3;

pub const DAYS_PER_WEEK: usize = 7;
