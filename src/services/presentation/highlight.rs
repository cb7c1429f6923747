use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::models::event::EventId;

/// How long a tapped grid day stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(5);

/// A tapped day in a card's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridHighlight {
    pub event_id: EventId,
    pub index: usize,
    pub date: Option<NaiveDate>,
    tapped_at: Instant,
}

impl GridHighlight {
    pub fn expires_at(&self) -> Instant {
        self.tapped_at + HIGHLIGHT_DURATION
    }
}

/// The single highlighted grid day, if any.
///
/// Only the latest tap counts: expiry is measured from it, so an older tap
/// can never clear a newer one.
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    current: Option<GridHighlight>,
}

impl HighlightState {
    pub fn tap(&mut self, event_id: EventId, index: usize, date: Option<NaiveDate>, now: Instant) {
        self.current = Some(GridHighlight {
            event_id,
            index,
            date,
            tapped_at: now,
        });
    }

    pub fn current(&self) -> Option<&GridHighlight> {
        self.current.as_ref()
    }

    pub fn is_highlighted(&self, event_id: EventId, index: usize) -> bool {
        self.current
            .is_some_and(|highlight| highlight.event_id == event_id && highlight.index == index)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Clears the highlight once its duration has passed. Returns whether
    /// it was cleared.
    pub fn clear_expired(&mut self, now: Instant) -> bool {
        match self.current {
            Some(highlight) if now >= highlight.expires_at() => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// When the UI should next call [`HighlightState::clear_expired`].
    pub fn next_expiry(&self) -> Option<Instant> {
        self.current.map(|highlight| highlight.expires_at())
    }
}
