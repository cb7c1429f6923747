use std::time::Instant;

use chrono::{DateTime, Datelike, Local, NaiveDate};
use thiserror::Error;

use super::highlight::{GridHighlight, HighlightState};
use super::metrics::CardMetrics;
use crate::models::display::{
    BackgroundStyle, DisplaySettings, GridShape, RgbaColor, TimeDisplayStyle,
};
use crate::models::event::{Event, EventId, ProgressDetails};
use crate::models::settings::GlobalSettings;
use crate::services::event_store::EventStore;
use crate::services::storage::KeyValueStore;
use crate::utils::date::start_of_year;

/// Modal sheets the UI can present over the card pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Customize,
    TrackEvent,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackEventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,

    #[error("Target date {0} is before today")]
    TargetInPast(NaiveDate),

    #[error("Event {0} not found")]
    NotFound(EventId),

    #[error("The year tracker cannot be edited or deleted")]
    YearTrackerLocked,

    #[error("\"{0}\" is reserved for the year tracker")]
    ReservedTitle(i32),
}

/// Everything a renderer needs for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub event_id: EventId,
    pub title: String,
    pub progress: ProgressDetails,
    pub metrics: CardMetrics,
    pub settings: DisplaySettings,
    /// Date of the first grid cell.
    pub grid_start: NaiveDate,
    pub is_year_tracker: bool,
}

impl CardView {
    pub fn is_editable(&self) -> bool {
        !self.is_year_tracker
    }
}

/// Presentation state over an [`EventStore`] and the [`GlobalSettings`].
///
/// Owns the non-persisted display settings of the year tracker, the pager
/// position, the open sheet and the grid highlight. Global style changes go
/// through this type so every card color is recomputed.
pub struct TrackerController<S: KeyValueStore> {
    store: EventStore<S>,
    settings: GlobalSettings,
    year_tracker_settings: DisplaySettings,
    today: NaiveDate,
    selected_tab: usize,
    sheet: Option<Sheet>,
    highlight: HighlightState,
}

impl<S: KeyValueStore> TrackerController<S> {
    pub fn new(store: EventStore<S>, settings: GlobalSettings) -> Self {
        Self::with_today(store, settings, Local::now().date_naive())
    }

    pub fn with_today(store: EventStore<S>, settings: GlobalSettings, today: NaiveDate) -> Self {
        let year_tracker_settings =
            DisplaySettings::for_background(settings.effective_background_style());
        Self {
            store,
            settings,
            year_tracker_settings,
            today,
            selected_tab: 0,
            sheet: None,
            highlight: HighlightState::default(),
        }
    }

    pub fn store(&self) -> &EventStore<S> {
        &self.store
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_year(&self) -> i32 {
        self.today.year()
    }

    fn is_year_tracker(&self, event: &Event) -> bool {
        event.is_year_tracker_for(self.current_year())
    }

    /// Effective display settings for `event`, with the default color
    /// resolved against the current background.
    pub fn settings_for(&self, event: &Event) -> DisplaySettings {
        if self.is_year_tracker(event) {
            return self.year_tracker_settings;
        }

        let background = self.settings.effective_background_style();
        let mut settings = self
            .store
            .display_settings_for(event.id())
            .copied()
            .unwrap_or_else(|| DisplaySettings::for_background(background));
        settings.update_color(background);
        settings
    }

    /// Year tracker first, then the other events in the order they were
    /// added.
    pub fn displayed_events(&self) -> Vec<&Event> {
        let year = self.current_year();
        let tracker = self.store.year_tracker(year);
        tracker
            .into_iter()
            .chain(
                self.store
                    .events()
                    .iter()
                    .filter(|event| !event.is_year_tracker_for(year)),
            )
            .collect()
    }

    pub fn cards(&self) -> Vec<CardView> {
        self.displayed_events()
            .into_iter()
            .map(|event| self.card_for(event))
            .collect()
    }

    fn card_for(&self, event: &Event) -> CardView {
        let progress = event.progress_details_on(self.today);
        let is_year_tracker = self.is_year_tracker(event);
        let grid_start = if is_year_tracker {
            start_of_year(self.current_year()).unwrap_or(self.today)
        } else {
            event.creation_date().date_naive()
        };

        CardView {
            event_id: event.id(),
            title: event.title().to_string(),
            progress,
            metrics: CardMetrics::new(progress),
            settings: self.settings_for(event),
            grid_start,
            is_year_tracker,
        }
    }

    // ── Global style ───────────────────────────────────────────────────

    pub fn set_background_style(&mut self, style: BackgroundStyle) {
        self.settings.set_background_style(style);
        self.update_all_colors();
    }

    pub fn set_grid_shape(&mut self, shape: GridShape) {
        self.settings.set_grid_shape(shape);
    }

    /// Records the host appearance and recomputes colors, even when the
    /// appearance did not change.
    pub fn update_system_appearance(&mut self, is_dark: bool) {
        self.settings.update_system_appearance(is_dark);
        self.update_all_colors();
    }

    /// Applies a polled host appearance. Only a change triggers the color
    /// cascade; returns whether one happened.
    pub fn sync_system_appearance(&mut self, is_dark: bool) -> bool {
        if self.settings.system_is_dark() == is_dark {
            return false;
        }
        log::info!("System appearance changed: dark={is_dark}");
        self.update_system_appearance(is_dark);
        true
    }

    fn update_all_colors(&mut self) {
        let background = self.settings.effective_background_style();
        self.year_tracker_settings.update_color(background);
        let changed = self.store.update_all_colors(background);
        log::debug!(
            "Recomputed card colors for {:?} background ({} stored changed)",
            background,
            changed
        );
    }

    // ── Per-card customization ─────────────────────────────────────────

    pub fn set_style(&mut self, id: EventId, style: TimeDisplayStyle) -> bool {
        self.modify_settings(id, |settings, _| settings.set_style(style))
    }

    pub fn set_show_percentage(&mut self, id: EventId, show_percentage: bool) -> bool {
        self.modify_settings(id, |settings, _| settings.set_show_percentage(show_percentage))
    }

    pub fn select_color(&mut self, id: EventId, color: RgbaColor) -> bool {
        self.modify_settings(id, |settings, background| {
            settings.select_color(color, background)
        })
    }

    /// Applies `update` to the settings of `id`: the controller's own copy for
    /// the year tracker, the persisted entry otherwise.
    fn modify_settings(
        &mut self,
        id: EventId,
        update: impl FnOnce(&mut DisplaySettings, BackgroundStyle),
    ) -> bool {
        let background = self.settings.effective_background_style();
        let Some(event) = self.store.event(id) else {
            log::warn!("Cannot customize unknown event {id}");
            return false;
        };

        if self.is_year_tracker(event) {
            update(&mut self.year_tracker_settings, background);
            return true;
        }

        if self.store.display_settings_for(id).is_some() {
            self.store
                .update_display_settings(id, |settings| update(settings, background));
        } else {
            let mut settings = self.settings_for(event);
            update(&mut settings, background);
            self.store.insert_display_settings(id, settings);
        }
        true
    }

    // ── Event lifecycle ────────────────────────────────────────────────

    fn validate(&self, title: &str, target_date: DateTime<Local>) -> Result<(), TrackEventError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TrackEventError::EmptyTitle);
        }
        let year = self.current_year();
        if title == year.to_string() {
            return Err(TrackEventError::ReservedTitle(year));
        }
        let target_day = target_date.date_naive();
        if target_day < self.today {
            return Err(TrackEventError::TargetInPast(target_day));
        }
        Ok(())
    }

    /// Starts tracking a new event created now.
    pub fn track_event(
        &mut self,
        title: &str,
        target_date: DateTime<Local>,
    ) -> Result<EventId, TrackEventError> {
        self.track_event_at(title, target_date, Local::now())
    }

    pub fn track_event_at(
        &mut self,
        title: &str,
        target_date: DateTime<Local>,
        now: DateTime<Local>,
    ) -> Result<EventId, TrackEventError> {
        self.validate(title, target_date)?;

        let event = Event::with_creation_date(title, target_date, now);
        let id = event.id();
        self.store.save_event(event);

        let background = self.settings.effective_background_style();
        self.store
            .update_display_settings(id, |settings| settings.update_color(background));
        log::info!("Tracking event {id} ({title})");
        Ok(id)
    }

    pub fn edit_event(
        &mut self,
        id: EventId,
        title: &str,
        target_date: DateTime<Local>,
    ) -> Result<(), TrackEventError> {
        self.ensure_editable(id)?;
        self.validate(title, target_date)?;
        self.store.update_event(id, title, target_date);
        Ok(())
    }

    pub fn delete_event(&mut self, id: EventId) -> Result<(), TrackEventError> {
        self.ensure_editable(id)?;
        self.store.delete_event(id);
        if self
            .highlight
            .current()
            .is_some_and(|highlight| highlight.event_id == id)
        {
            self.highlight.clear();
        }
        self.clamp_selected_tab();
        Ok(())
    }

    fn ensure_editable(&self, id: EventId) -> Result<(), TrackEventError> {
        let event = self.store.event(id).ok_or(TrackEventError::NotFound(id))?;
        if self.is_year_tracker(event) {
            return Err(TrackEventError::YearTrackerLocked);
        }
        Ok(())
    }

    /// Moves "today" forward, recreating the year tracker after a year
    /// rollover. Returns whether the date changed.
    pub fn refresh_today(&mut self, now: DateTime<Local>) -> bool {
        let today = now.date_naive();
        if today == self.today {
            return false;
        }

        let rolled_over = today.year() != self.today.year();
        self.today = today;
        if rolled_over {
            log::info!("Year changed to {}", today.year());
            self.store.add_default_year_tracker_if_needed_at(now);
        }
        self.clamp_selected_tab();
        true
    }

    // ── Navigation ─────────────────────────────────────────────────────

    pub fn selected_tab(&self) -> usize {
        self.selected_tab
    }

    pub fn select_tab(&mut self, index: usize) {
        self.selected_tab = index;
        self.clamp_selected_tab();
    }

    fn clamp_selected_tab(&mut self) {
        let count = self.displayed_events().len();
        self.selected_tab = self.selected_tab.min(count.saturating_sub(1));
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.displayed_events().get(self.selected_tab).copied()
    }

    pub fn sheet(&self) -> Option<Sheet> {
        self.sheet
    }

    pub fn open_sheet(&mut self, sheet: Sheet) {
        self.sheet = Some(sheet);
    }

    pub fn close_sheet(&mut self) {
        self.sheet = None;
    }

    // ── Grid highlight ─────────────────────────────────────────────────

    /// Highlights grid day `index` of `id`'s card, replacing any previous
    /// highlight.
    pub fn tap_grid_cell(&mut self, id: EventId, index: usize, now: Instant) -> bool {
        let Some(event) = self.store.event(id) else {
            return false;
        };
        let card = self.card_for(event);
        let Some(cell) = card.metrics.grid_cell(card.grid_start, index) else {
            return false;
        };
        self.highlight.tap(id, index, cell.date, now);
        true
    }

    pub fn highlight(&self) -> Option<&GridHighlight> {
        self.highlight.current()
    }

    pub fn is_highlighted(&self, id: EventId, index: usize) -> bool {
        self.highlight.is_highlighted(id, index)
    }

    pub fn clear_highlight(&mut self) {
        self.highlight.clear();
    }

    pub fn clear_expired_highlight(&mut self, now: Instant) -> bool {
        self.highlight.clear_expired(now)
    }

    pub fn next_highlight_expiry(&self) -> Option<Instant> {
        self.highlight.next_expiry()
    }
}
