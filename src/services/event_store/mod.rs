mod persistence;
mod service;

pub use persistence::{DISPLAY_SETTINGS_KEY, EVENTS_KEY};
pub use service::{DisplaySettingsMap, EventStore};
