use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local};

use super::persistence::{load_value, save_value, DISPLAY_SETTINGS_KEY, EVENTS_KEY};
use crate::models::display::{BackgroundStyle, DisplaySettings};
use crate::models::event::{Event, EventId};
use crate::services::storage::KeyValueStore;

pub type DisplaySettingsMap = BTreeMap<EventId, DisplaySettings>;

/// Owns the tracked events and their display settings.
///
/// Every mutation is written through to the backend before returning.
/// Storage failures are logged and otherwise ignored: the in-memory state
/// stays authoritative and the persisted copy goes stale.
pub struct EventStore<S: KeyValueStore> {
    backend: S,
    events: Vec<Event>,
    display_settings: DisplaySettingsMap,
    revision: u64,
}

impl<S: KeyValueStore> EventStore<S> {
    /// Loads persisted state and makes sure this year's tracker exists.
    pub fn new(backend: S) -> Self {
        Self::load_at(backend, Local::now())
    }

    /// Same as [`EventStore::new`] with an explicit clock reading.
    pub fn load_at(backend: S, now: DateTime<Local>) -> Self {
        let mut store = Self {
            backend,
            events: Vec::new(),
            display_settings: DisplaySettingsMap::new(),
            revision: 0,
        };
        store.load_events();
        store.load_display_settings();
        store.add_default_year_tracker_if_needed_at(now);

        log::info!(
            "Loaded event store: events={}, display_settings={}",
            store.events.len(),
            store.display_settings.len()
        );
        store
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id() == id)
    }

    pub fn display_settings(&self) -> &DisplaySettingsMap {
        &self.display_settings
    }

    pub fn display_settings_for(&self, id: EventId) -> Option<&DisplaySettings> {
        self.display_settings.get(&id)
    }

    /// The tracker titled with `year`, if present.
    pub fn year_tracker(&self, year: i32) -> Option<&Event> {
        self.events.iter().find(|event| event.is_year_tracker_for(year))
    }

    /// Bumped by every mutation; compare against a previous value to know
    /// whether to re-fetch.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Replaces the in-memory events with the persisted list. Missing or
    /// undecodable data leaves the list empty.
    pub fn load_events(&mut self) {
        self.events = match load_value::<_, Vec<Event>>(&self.backend, EVENTS_KEY) {
            Ok(Some(events)) => events,
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("Discarding persisted events: {err}");
                Vec::new()
            }
        };
        self.revision += 1;
    }

    pub fn save_events(&mut self) {
        if let Err(err) = save_value(&mut self.backend, EVENTS_KEY, &self.events) {
            log::error!("Failed to persist {} events: {err}", self.events.len());
        }
    }

    /// Replaces the in-memory display settings with the persisted mapping.
    /// Missing or undecodable data leaves the mapping empty.
    pub fn load_display_settings(&mut self) {
        self.display_settings =
            match load_value::<_, DisplaySettingsMap>(&self.backend, DISPLAY_SETTINGS_KEY) {
                Ok(Some(settings)) => settings,
                Ok(None) => DisplaySettingsMap::new(),
                Err(err) => {
                    log::warn!("Discarding persisted display settings: {err}");
                    DisplaySettingsMap::new()
                }
            };
        self.revision += 1;
    }

    pub fn save_display_settings(&mut self) {
        if let Err(err) = save_value(&mut self.backend, DISPLAY_SETTINGS_KEY, &self.display_settings)
        {
            log::error!(
                "Failed to persist {} display settings: {err}",
                self.display_settings.len()
            );
        }
    }

    pub fn add_default_year_tracker_if_needed(&mut self) -> bool {
        self.add_default_year_tracker_if_needed_at(Local::now())
    }

    /// Inserts the tracker for the year containing `now` at the front unless
    /// an event already carries that year as its title. Returns whether one
    /// was added.
    pub fn add_default_year_tracker_if_needed_at(&mut self, now: DateTime<Local>) -> bool {
        if self.year_tracker(now.year()).is_some() {
            return false;
        }

        let tracker = Event::default_year_tracker_at(now);
        log::info!(
            "Adding year tracker {} targeting {}",
            tracker.title(),
            tracker.target_date()
        );
        self.events.insert(0, tracker);
        self.revision += 1;
        self.save_events();
        true
    }

    /// Appends `event` and gives it default display settings.
    ///
    /// Settings already stored under the same id are kept.
    pub fn save_event(&mut self, event: Event) {
        let id = event.id();
        self.events.push(event);
        self.display_settings.entry(id).or_default();
        self.revision += 1;
        self.save_events();
        self.save_display_settings();
    }

    /// Replaces the event with `id`, keeping its id and creation date so its
    /// display settings stay attached. Returns false when no event matches.
    pub fn update_event(
        &mut self,
        id: EventId,
        title: impl Into<String>,
        target_date: DateTime<Local>,
    ) -> bool {
        let Some(index) = self.events.iter().position(|event| event.id() == id) else {
            log::warn!("update_event: event {id} not found");
            return false;
        };

        self.events[index] = self.events[index].replaced(title, target_date);
        self.revision += 1;
        self.save_events();
        true
    }

    /// Removes the event with `id`. Its display settings entry is left in
    /// place; see [`EventStore::prune_orphaned_display_settings`].
    pub fn delete_event(&mut self, id: EventId) -> bool {
        let initial_count = self.events.len();
        self.events.retain(|event| event.id() != id);
        if self.events.len() == initial_count {
            log::warn!("delete_event: event {id} not found");
            return false;
        }

        log::info!("delete_event: removed event {id}");
        self.revision += 1;
        self.save_events();
        true
    }

    /// Mutates the settings stored for `id` and persists the mapping.
    /// Returns `None` when the event has no stored settings.
    pub fn update_display_settings<R>(
        &mut self,
        id: EventId,
        update: impl FnOnce(&mut DisplaySettings) -> R,
    ) -> Option<R> {
        let settings = self.display_settings.get_mut(&id)?;
        let result = update(settings);
        self.revision += 1;
        self.save_display_settings();
        Some(result)
    }

    /// Stores `settings` for `id`, replacing any previous entry, and persists
    /// the mapping.
    pub fn insert_display_settings(&mut self, id: EventId, settings: DisplaySettings) {
        self.display_settings.insert(id, settings);
        self.revision += 1;
        self.save_display_settings();
    }

    /// Re-derives default colors of every stored entry for `background`.
    /// Persists only when something changed; returns the number changed.
    pub fn update_all_colors(&mut self, background: BackgroundStyle) -> usize {
        let changed = self
            .display_settings
            .values_mut()
            .map(|settings| settings.update_color(background))
            .filter(|changed| *changed)
            .count();

        if changed > 0 {
            self.revision += 1;
            self.save_display_settings();
        }
        changed
    }

    /// Drops settings whose event no longer exists. Returns how many were
    /// removed.
    pub fn prune_orphaned_display_settings(&mut self) -> usize {
        let initial_count = self.display_settings.len();
        let events = &self.events;
        self.display_settings
            .retain(|id, _| events.iter().any(|event| event.id() == *id));

        let removed = initial_count - self.display_settings.len();
        if removed > 0 {
            log::info!("Pruned {removed} orphaned display settings");
            self.revision += 1;
            self.save_display_settings();
        }
        removed
    }
}
