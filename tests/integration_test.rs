// Integration tests for event persistence and the card lifecycle
mod fixtures;

use chrono::{Duration, Local, NaiveDate, Offset, TimeZone};
use fixtures::{date, dates, events, local_noon};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use timelapse::models::display::{BackgroundStyle, RgbaColor, TimeDisplayStyle};
use timelapse::models::event::Event;
use timelapse::models::settings::GlobalSettings;
use timelapse::services::event_store::{EventStore, DISPLAY_SETTINGS_KEY, EVENTS_KEY};
use timelapse::services::presentation::TrackerController;
use timelapse::services::storage::{KeyValueStore, MemoryStore, SqliteStore};

fn open_store(dir: &TempDir) -> SqliteStore {
    let path = dir.path().join("timelapse.db");
    SqliteStore::open(path.to_str().unwrap()).expect("Failed to open database")
}

#[test]
fn test_events_survive_restart() {
    let dir = TempDir::new().unwrap();
    let now = dates::jan_10_2024();
    let blue = RgbaColor::from_rgb8(0, 122, 255);

    let trip = events::summer_trip();
    {
        let mut store = EventStore::load_at(open_store(&dir), now);
        store.save_event(trip.clone());
        store.update_display_settings(trip.id(), |settings| {
            settings.set_style(TimeDisplayStyle::ProgressBar);
            settings.select_color(blue, BackgroundStyle::Dark);
        });
    }

    let reopened = EventStore::load_at(open_store(&dir), now);
    let titles: Vec<&str> = reopened.events().iter().map(Event::title).collect();
    assert_eq!(titles, vec!["2024", "Summer trip"]);
    assert_eq!(reopened.event(trip.id()), Some(&trip));

    let settings = reopened.display_settings_for(trip.id()).unwrap();
    assert_eq!(settings.style(), TimeDisplayStyle::ProgressBar);
    assert!(!settings.is_using_default_color());
    assert!(settings.display_color().approx_eq(&blue));
}

#[test]
fn test_empty_database_gets_year_tracker() {
    let dir = TempDir::new().unwrap();
    let store = EventStore::load_at(open_store(&dir), dates::leap_day_2024());

    assert_eq!(store.events().len(), 1);
    let tracker = &store.events()[0];
    assert_eq!(tracker.title(), "2024");
    assert_eq!(tracker.target_date().date_naive(), date(2025, 1, 1));

    // The tracker is written through immediately.
    let raw = store.backend().get(EVENTS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"2024\""));
    assert!(store.backend().get(DISPLAY_SETTINGS_KEY).unwrap().is_none());
}

#[test]
fn test_year_tracker_not_duplicated_across_restarts() {
    let dir = TempDir::new().unwrap();
    let now = dates::leap_day_2024();
    drop(EventStore::load_at(open_store(&dir), now));

    let mut store = EventStore::load_at(open_store(&dir), now);
    assert!(!store.add_default_year_tracker_if_needed_at(now));
    let trackers = store
        .events()
        .iter()
        .filter(|event| event.is_year_tracker_for(2024))
        .count();
    assert_eq!(trackers, 1);
}

#[test]
fn test_corrupt_blob_loads_empty() {
    let dir = TempDir::new().unwrap();
    {
        let mut backend = open_store(&dir);
        backend.set(EVENTS_KEY, "{ not an array").unwrap();
        backend.set(DISPLAY_SETTINGS_KEY, "42").unwrap();
    }

    let store = EventStore::load_at(open_store(&dir), dates::jan_10_2024());
    assert_eq!(store.events().len(), 1);
    assert!(store.display_settings().is_empty());
}

#[test]
fn test_summer_trip_progress() {
    let trip = events::summer_trip();
    let raw_days = (date(2024, 6, 10) - date(2024, 1, 10)).num_days();

    let progress = trip.progress_details_on(date(2024, 1, 10));
    assert_eq!(progress.days_left, raw_days - 1);
    assert_eq!(progress.total_days, raw_days);

    let later = trip.progress_details_on(date(2024, 3, 1));
    assert_eq!(later.total_days, raw_days);
    assert_eq!(later.days_left, (date(2024, 6, 10) - date(2024, 3, 1)).num_days() - 1);
}

#[test]
fn test_past_target_has_no_days_left() {
    let event = events::event_due_in(3, dates::jan_10_2024());
    assert_eq!(event.progress_details_on(date(2024, 1, 13)).days_left, 0);
    assert_eq!(event.progress_details_on(date(2024, 2, 1)).days_left, 0);
    assert_eq!(event.progress_details_on(date(2024, 1, 12)).days_left, 0);
    assert_eq!(event.progress_details_on(date(2024, 1, 11)).days_left, 1);
}

#[test]
fn test_background_switch_persists_default_colors() {
    let dir = TempDir::new().unwrap();
    let now = dates::jan_10_2024();
    let orange = RgbaColor::from_rgb8(255, 149, 0);

    let (default_id, custom_id) = {
        let store = EventStore::load_at(open_store(&dir), now);
        let mut controller =
            TrackerController::with_today(store, GlobalSettings::default(), now.date_naive());
        let default_id = controller
            .track_event_at("Default", dates::jun_10_2024(), now)
            .unwrap();
        let custom_id = controller
            .track_event_at("Custom", dates::jun_10_2024(), now)
            .unwrap();
        controller.select_color(custom_id, orange);
        controller.set_background_style(BackgroundStyle::Light);
        (default_id, custom_id)
    };

    let reopened = EventStore::load_at(open_store(&dir), now);
    let default_settings = reopened.display_settings_for(default_id).unwrap();
    assert_eq!(default_settings.display_color(), RgbaColor::BLACK);
    assert_eq!(default_settings.background_style(), BackgroundStyle::Light);
    assert!(reopened
        .display_settings_for(custom_id)
        .unwrap()
        .display_color()
        .approx_eq(&orange));
}

#[test]
fn test_edit_and_delete_through_controller() {
    let now = dates::jan_10_2024();
    let store = EventStore::load_at(MemoryStore::new(), now);
    let mut controller =
        TrackerController::with_today(store, GlobalSettings::default(), now.date_naive());

    let id = controller
        .track_event_at("Dentist", local_noon(2024, 2, 1), now)
        .unwrap();
    controller.set_show_percentage(id, true);
    controller
        .edit_event(id, "Dentist (moved)", local_noon(2024, 2, 8))
        .unwrap();

    let edited = controller.store().event(id).unwrap();
    assert_eq!(edited.title(), "Dentist (moved)");
    assert_eq!(edited.creation_date(), now);
    assert!(controller
        .store()
        .display_settings_for(id)
        .unwrap()
        .show_percentage());

    controller.delete_event(id).unwrap();
    assert!(controller.store().event(id).is_none());
    // Settings stay until pruned.
    assert!(controller.store().display_settings_for(id).is_some());
}

#[test]
fn test_new_year_while_running() {
    let dir = TempDir::new().unwrap();
    let eve = dates::new_years_eve_2025();
    let store = EventStore::load_at(open_store(&dir), eve);
    let mut controller =
        TrackerController::with_today(store, GlobalSettings::default(), eve.date_naive());
    assert_eq!(controller.cards()[0].title, "2025");

    let new_year = local_noon(2026, 1, 1);
    assert!(controller.refresh_today(new_year));
    let cards = controller.cards();
    assert_eq!(cards[0].title, "2026");
    assert!(cards[0].is_year_tracker);
    assert_eq!(cards[0].grid_start, date(2026, 1, 1));
    assert_eq!(cards[0].progress.total_days, 365);

    let reopened = EventStore::load_at(open_store(&dir), new_year);
    assert!(reopened.year_tracker(2026).is_some());
    assert!(reopened.year_tracker(2025).is_some());
}

fn local_at(day: NaiveDate, hour: u32, minute: u32) -> chrono::DateTime<Local> {
    Local
        .from_local_datetime(&day.and_hms_opt(hour, minute, 0).unwrap())
        .earliest()
        .unwrap()
}

// Written against America/New_York, where clocks jump forward on
// 2024-03-10 and back on 2024-11-03. Each span is shorter (or longer) than
// whole 24-hour days there, so only a calendar-day count gets it right; the
// expectations hold in every other zone too.
#[test]
fn test_day_counts_across_us_dst_changes() {
    let created = local_at(date(2024, 3, 10), 0, 30);
    let target = local_at(date(2024, 3, 11), 0, 10);
    let spring = Event::with_creation_date("Spring forward", target, created);
    let progress = spring.progress_details_on(date(2024, 3, 10));
    assert_eq!(progress.total_days, 1);
    assert_eq!(progress.days_left, 0);

    let created = local_at(date(2024, 11, 2), 23, 30);
    let target = local_at(date(2024, 11, 5), 0, 15);
    let autumn = Event::with_creation_date("Fall back", target, created);
    let progress = autumn.progress_details_on(date(2024, 11, 2));
    assert_eq!(progress.total_days, 3);
    assert_eq!(progress.days_left, 2);
    assert_eq!(autumn.progress_details_on(date(2024, 11, 3)).days_left, 1);
}

#[test]
fn test_day_counts_across_local_dst_change() {
    let offset_at_noon = |day: NaiveDate| local_at(day, 12, 0).offset().fix();
    let start = date(2024, 1, 1);
    let Some(before) = (0..366)
        .map(|offset| start + Duration::days(offset))
        .find(|day| offset_at_noon(*day) != offset_at_noon(*day + Duration::days(1)))
    else {
        // The local zone has no daylight saving in 2024.
        return;
    };

    let created = local_at(before, 23, 0);
    let target = local_at(before + Duration::days(2), 0, 30);
    let event = Event::with_creation_date("Across the change", target, created);

    let progress = event.progress_details_on(before);
    assert_eq!(progress.total_days, 2);
    assert_eq!(progress.days_left, 1);
    assert_eq!(
        event
            .progress_details_on(before + Duration::days(1))
            .days_left,
        0
    );
}
