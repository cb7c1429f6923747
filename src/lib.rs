// Timelapse Library
// Countdown cards for the current year and user-defined events

pub mod models;
pub mod services;
pub mod utils;
