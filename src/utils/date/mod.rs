// Date utility functions
// Calendar-day arithmetic in the local time zone

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

/// Local midnight at the start of `date`.
///
/// Returns `None` only when midnight does not exist locally (a DST gap that
/// starts at 00:00); callers fall back to the first valid instant of the day.
pub fn start_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&midnight).earliest()
}

/// Local midnight at the start of `date`, skipping forward an hour when
/// midnight falls in a DST gap.
pub fn start_of_day_or_after(date: NaiveDate) -> Option<DateTime<Local>> {
    start_of_day(date).or_else(|| {
        let one_am = date.and_hms_opt(1, 0, 0)?;
        Local.from_local_datetime(&one_am).earliest()
    })
}

pub fn start_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Number of calendar-day boundaries between `from` and `to`.
///
/// Negative when `to` is before `from`. Works on dates, not elapsed seconds,
/// so a 23- or 25-hour DST day still counts as one.
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// January 1 of the year following `date`.
pub fn first_day_of_next_year(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
}
