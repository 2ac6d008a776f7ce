//! Calendar-month arithmetic for entry ages.
//!
//! Ages are measured in calendar months: whole months are counted by
//! stepping the start date forward one month at a time (day-of-month
//! clamped to the end of shorter months), and the remainder is the fraction
//! of the following month that has elapsed, measured in days.

use chrono::{Datelike, Months, NaiveDate};

/// Add whole calendar months to `date`, clamping the day to the month's end.
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Age in calendar months from `from` to `to`.
///
/// Returns `0.0` when `to` is not after `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    if to <= from {
        return 0.0;
    }

    let rough = i64::from(to.year() - from.year()) * 12 + i64::from(to.month0())
        - i64::from(from.month0());
    let mut whole = u32::try_from(rough.max(0)).unwrap_or(0);
    while whole > 0 && add_months(from, whole) > to {
        whole -= 1;
    }

    let anchor = add_months(from, whole);
    let next = add_months(from, whole + 1);
    let elapsed = (to - anchor).num_days() as f64;
    let span = (next - anchor).num_days().max(1) as f64;

    f64::from(whole) + elapsed / span
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
