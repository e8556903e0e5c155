//! Repeat cadences and the arithmetic for stepping through them.
//!
//! Occurrence `n` is always computed from the event's original start rather
//! than from occurrence `n - 1`. For monthly and yearly cadences this means a
//! start on the 31st clamps to the last day of shorter months and comes back
//! to the 31st when the month allows it, instead of drifting to the 28th.

use chrono::{Datelike, Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// How often an event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Parse a stored repeat value. Returns `None` for values outside the
    /// known cadences so the caller can decide how to degrade.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "never" => Some(Recurrence::None),
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            "yearly" => Some(Recurrence::Yearly),
            _ => None,
        }
    }

    pub fn is_repeating(self) -> bool {
        self != Recurrence::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }

    /// Start of the `n`-th occurrence (0 is the original start).
    ///
    /// Returns `None` when the result falls outside chrono's representable
    /// range, or for `n > 0` on a non-repeating event.
    pub fn nth_start(self, origin: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            Recurrence::None => (n == 0).then_some(origin),
            Recurrence::Daily => origin.checked_add_signed(TimeDelta::try_days(i64::from(n))?),
            Recurrence::Weekly => origin.checked_add_signed(TimeDelta::try_weeks(i64::from(n))?),
            Recurrence::Monthly => origin.checked_add_months(Months::new(n)),
            Recurrence::Yearly => origin.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    /// Index of the first occurrence starting at or after `bound`.
    ///
    /// Starts from an estimate that never overshoots and walks forward, so
    /// the cost does not grow with the distance between `origin` and `bound`.
    pub fn first_index_at_or_after(self, origin: NaiveDateTime, bound: NaiveDateTime) -> Option<u32> {
        if origin >= bound {
            return Some(0);
        }

        let estimate: i64 = match self {
            Recurrence::None => return None,
            Recurrence::Daily => (bound - origin).num_days(),
            Recurrence::Weekly => (bound - origin).num_days() / 7,
            Recurrence::Monthly => month_index(bound) - month_index(origin) - 1,
            Recurrence::Yearly => i64::from(bound.year() - origin.year()) - 1,
        };

        let mut n = u32::try_from(estimate.max(0)).ok()?;
        while self.nth_start(origin, n)? < bound {
            n = n.checked_add(1)?;
        }
        Some(n)
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn month_index(dt: NaiveDateTime) -> i64 {
    i64::from(dt.year()) * 12 + i64::from(dt.month0())
}
