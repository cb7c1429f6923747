// Appearance service
// Reads the host light/dark preference for the Device background style

use std::time::Duration;

/// How often a running app re-reads the host appearance.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Whether the host prefers a dark appearance, or `None` when the platform
/// does not report one.
pub fn detect_system_dark() -> Option<bool> {
    mode_is_dark(dark_light::detect())
}

fn mode_is_dark(mode: dark_light::Mode) -> Option<bool> {
    match mode {
        dark_light::Mode::Dark => Some(true),
        dark_light::Mode::Light => Some(false),
        dark_light::Mode::Default => None,
    }
}
