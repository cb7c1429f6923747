// Module exports for models

pub mod display;
pub mod event;
pub mod settings;
