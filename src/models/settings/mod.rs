// Settings module
// Process-wide visual defaults shared by every card

use crate::models::display::{BackgroundStyle, GridShape, RgbaColor};

/// Global card appearance. Lives for the process and is never persisted.
///
/// Every setter bumps [`GlobalSettings::revision`], including
/// [`GlobalSettings::update_system_appearance`] when the value did not
/// change, so observers always get a chance to recompute colors.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    background_style: BackgroundStyle,
    grid_shape: GridShape,
    system_is_dark: bool,
    revision: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self::new(BackgroundStyle::Dark, GridShape::Circle)
    }
}

impl GlobalSettings {
    pub fn new(background_style: BackgroundStyle, grid_shape: GridShape) -> Self {
        Self {
            background_style,
            grid_shape,
            system_is_dark: false,
            revision: 0,
        }
    }

    pub fn background_style(&self) -> BackgroundStyle {
        self.background_style
    }

    pub fn grid_shape(&self) -> GridShape {
        self.grid_shape
    }

    pub fn system_is_dark(&self) -> bool {
        self.system_is_dark
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Background with `Device` resolved against the host appearance.
    pub fn effective_background_style(&self) -> BackgroundStyle {
        match self.background_style {
            BackgroundStyle::Device if self.system_is_dark => BackgroundStyle::Dark,
            BackgroundStyle::Device => BackgroundStyle::Light,
            style => style,
        }
    }

    /// Primary text color for card chrome.
    pub fn inverted_color(&self) -> RgbaColor {
        RgbaColor::default_for(self.effective_background_style())
    }

    /// Secondary text color for card chrome.
    pub fn inverted_secondary_color(&self) -> RgbaColor {
        if self.effective_background_style() == BackgroundStyle::Light {
            RgbaColor::from_rgb8(142, 142, 147)
        } else {
            RgbaColor::gray(0.5)
        }
    }

    /// Fill behind each card.
    pub fn card_background_color(&self) -> RgbaColor {
        if self.effective_background_style() == BackgroundStyle::Light {
            RgbaColor::WHITE
        } else {
            RgbaColor::gray(0.2)
        }
    }

    pub fn set_background_style(&mut self, style: BackgroundStyle) {
        self.background_style = style;
        self.revision += 1;
    }

    pub fn set_grid_shape(&mut self, shape: GridShape) {
        self.grid_shape = shape;
        self.revision += 1;
    }

    pub fn update_system_appearance(&mut self, is_dark: bool) {
        self.system_is_dark = is_dark;
        self.revision += 1;
    }
}
