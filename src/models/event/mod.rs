// Event module
// Tracked target dates and their day-based progress

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::date::{
    first_day_of_next_year, start_of_day_or_after, start_of_year, whole_days_between,
};

/// Denominator used for the year tracker if January 1 cannot be resolved.
const FALLBACK_YEAR_LENGTH: i64 = 365;

/// Unique identifier for tracked events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Days remaining and the span they are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressDetails {
    pub days_left: i64,
    pub total_days: i64,
}

/// A tracked target date.
///
/// Events are never edited in place: an edit produces a replacement record
/// through [`Event::replaced`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    title: String,
    target_date: DateTime<Local>,
    creation_date: DateTime<Local>,
}

impl Event {
    /// Create an event created right now.
    ///
    /// # Examples
    /// ```
    /// use timelapse::models::event::Event;
    /// use chrono::{Duration, Local};
    ///
    /// let event = Event::new("Launch", Local::now() + Duration::days(30));
    /// assert_eq!(event.title(), "Launch");
    /// ```
    pub fn new(title: impl Into<String>, target_date: DateTime<Local>) -> Self {
        Self::with_creation_date(title, target_date, Local::now())
    }

    pub fn with_creation_date(
        title: impl Into<String>,
        target_date: DateTime<Local>,
        creation_date: DateTime<Local>,
    ) -> Self {
        Self {
            id: EventId::new(),
            title: title.into(),
            target_date,
            creation_date,
        }
    }

    /// The year tracker for the year containing `now`: titled with the year
    /// and targeting local midnight on January 1 of the next year.
    pub fn default_year_tracker_at(now: DateTime<Local>) -> Self {
        let today = now.date_naive();
        let target_date = first_day_of_next_year(today)
            .and_then(start_of_day_or_after)
            .unwrap_or_else(|| now + Duration::days(FALLBACK_YEAR_LENGTH));
        Self::with_creation_date(today.year().to_string(), target_date, now)
    }

    pub fn default_year_tracker() -> Self {
        Self::default_year_tracker_at(Local::now())
    }

    /// Replacement record for an edit: same id and creation date, new title
    /// and target.
    pub fn replaced(&self, title: impl Into<String>, target_date: DateTime<Local>) -> Self {
        Self {
            id: self.id,
            title: title.into(),
            target_date,
            creation_date: self.creation_date,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_date(&self) -> DateTime<Local> {
        self.target_date
    }

    pub fn creation_date(&self) -> DateTime<Local> {
        self.creation_date
    }

    /// Whether this event is the year tracker for `year`.
    pub fn is_year_tracker_for(&self, year: i32) -> bool {
        self.title == year.to_string()
    }

    pub fn progress_details(&self) -> ProgressDetails {
        self.progress_details_on(Local::now().date_naive())
    }

    /// Progress as seen on `today`.
    ///
    /// `days_left` excludes today and the target day itself, so a target
    /// tomorrow has zero days left. The year tracker measures against the
    /// whole year; other events against the span since their creation day.
    pub fn progress_details_on(&self, today: NaiveDate) -> ProgressDetails {
        let target_day = self.target_date.date_naive();
        let days_left = (whole_days_between(today, target_day) - 1).max(0);

        if self.is_year_tracker_for(today.year()) {
            let total_days = start_of_year(today.year())
                .map(|start| whole_days_between(start, target_day))
                .unwrap_or(FALLBACK_YEAR_LENGTH);
            return ProgressDetails {
                days_left,
                total_days,
            };
        }

        let total_days = whole_days_between(self.creation_date.date_naive(), target_day).max(1);
        ProgressDetails {
            days_left,
            total_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).earliest().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_left_drops_one_extra_day() {
        let event = Event::with_creation_date("Trip", local(2024, 6, 10, 9), local(2024, 1, 10, 9));
        let progress = event.progress_details_on(date(2024, 1, 10));
        assert_eq!(progress.days_left, 151);
        assert_eq!(progress.total_days, 152);
    }

    #[test]
    fn test_days_left_never_negative() {
        let event = Event::with_creation_date("Past", local(2024, 1, 1, 12), local(2023, 12, 1, 12));
        assert_eq!(event.progress_details_on(date(2024, 1, 1)).days_left, 0);
        assert_eq!(event.progress_details_on(date(2024, 3, 1)).days_left, 0);
    }

    #[test]
    fn test_total_days_at_least_one() {
        let moment = local(2024, 5, 5, 8);
        let event = Event::with_creation_date("Same day", moment, moment);
        assert_eq!(event.progress_details_on(date(2024, 5, 5)).total_days, 1);
    }

    #[test]
    fn test_total_days_ignores_creation_time_of_day() {
        let event = Event::with_creation_date("Late", local(2024, 5, 10, 1), local(2024, 5, 5, 23));
        assert_eq!(event.progress_details_on(date(2024, 5, 6)).total_days, 5);
    }

    #[test]
    fn test_year_tracker_spans_whole_year() {
        let tracker = Event::default_year_tracker_at(local(2024, 8, 20, 15));
        assert_eq!(tracker.title(), "2024");
        assert_eq!(tracker.target_date().date_naive(), date(2025, 1, 1));

        let progress = tracker.progress_details_on(date(2024, 8, 20));
        assert_eq!(progress.total_days, 366);
        assert_eq!(progress.days_left, 133);
    }

    #[test]
    fn test_year_tracker_total_is_independent_of_creation() {
        let early = Event::default_year_tracker_at(local(2025, 1, 1, 0));
        let late = Event::default_year_tracker_at(local(2025, 12, 30, 22));
        let today = date(2025, 6, 1);
        assert_eq!(early.progress_details_on(today).total_days, 365);
        assert_eq!(late.progress_details_on(today).total_days, 365);
    }

    #[test]
    fn test_last_years_tracker_becomes_regular_event() {
        let tracker = Event::default_year_tracker_at(local(2024, 3, 1, 12));
        let progress = tracker.progress_details_on(date(2025, 1, 2));
        assert_eq!(progress.days_left, 0);
        assert_eq!(progress.total_days, 306);
    }

    #[test]
    fn test_replaced_keeps_identity_and_creation() {
        let original = Event::with_creation_date("Old", local(2024, 9, 1, 0), local(2024, 2, 1, 0));
        let edited = original.replaced("New", local(2024, 10, 1, 0));
        assert_eq!(edited.id(), original.id());
        assert_eq!(edited.creation_date(), original.creation_date());
        assert_eq!(edited.title(), "New");
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let event = Event::with_creation_date("Keys", local(2024, 9, 1, 0), local(2024, 2, 1, 0));
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("targetDate").is_some());
        assert!(json.get("creationDate").is_some());
        assert_eq!(json["id"], serde_json::Value::String(event.id().to_string()));
    }
}
