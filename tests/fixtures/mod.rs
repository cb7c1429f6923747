// Test fixtures - reusable test data
// Provides consistent dates and events across integration tests
#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Local noon on the given day; noon is never skipped by a DST change.
pub fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .earliest()
        .expect("valid local date")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Jan 10, 2024, the creation day of the sample trip
    pub fn jan_10_2024() -> DateTime<Local> {
        local_noon(2024, 1, 10)
    }

    /// Jun 10, 2024, the sample trip's target
    pub fn jun_10_2024() -> DateTime<Local> {
        local_noon(2024, 6, 10)
    }

    /// Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> DateTime<Local> {
        local_noon(2024, 2, 29)
    }

    /// Dec 31, 2025 late evening
    pub fn new_years_eve_2025() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 12, 31, 23, 30, 0)
            .earliest()
            .expect("valid local date")
    }
}

/// Sample events for testing
pub mod events {
    use super::*;
    use timelapse::models::event::Event;

    /// Trip created 2024-01-10, due 2024-06-10
    pub fn summer_trip() -> Event {
        Event::with_creation_date("Summer trip", dates::jun_10_2024(), dates::jan_10_2024())
    }

    pub fn event_due_in(days: i64, created: DateTime<Local>) -> Event {
        Event::with_creation_date(
            format!("Due in {days}"),
            created + chrono::Duration::days(days),
            created,
        )
    }
}
