// Display module
// Per-event card appearance: style, color and the default-color rule

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tolerance for comparing persisted float color components.
const COLOR_EPSILON: f32 = 1.0 / 512.0;

/// How a card renders its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimeDisplayStyle {
    #[default]
    Grid,
    Circle,
    ProgressBar,
    BoldText,
}

impl TimeDisplayStyle {
    pub const ALL: [TimeDisplayStyle; 4] = [
        TimeDisplayStyle::Grid,
        TimeDisplayStyle::Circle,
        TimeDisplayStyle::ProgressBar,
        TimeDisplayStyle::BoldText,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeDisplayStyle::Grid => "Grid",
            TimeDisplayStyle::Circle => "Circle",
            TimeDisplayStyle::ProgressBar => "Progress Bar",
            TimeDisplayStyle::BoldText => "Bold Text",
        }
    }
}

/// Card background preference. `Device` follows the host appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundStyle {
    Light,
    #[default]
    Dark,
    Device,
}

impl BackgroundStyle {
    pub const ALL: [BackgroundStyle; 3] = [
        BackgroundStyle::Light,
        BackgroundStyle::Dark,
        BackgroundStyle::Device,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BackgroundStyle::Light => "Light",
            BackgroundStyle::Dark => "Dark",
            BackgroundStyle::Device => "Device",
        }
    }
}

/// Shape of each day in the grid style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GridShape {
    #[default]
    Circle,
    Square,
    RoundedRectangle,
}

impl GridShape {
    pub const ALL: [GridShape; 3] = [GridShape::Circle, GridShape::Square, GridShape::RoundedRectangle];
}

/// RGBA color with components in `[0, 1]`.
///
/// Persisted as a four-element array. Arrays of any other length decode as
/// white rather than failing the whole blob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "[f32; 4]")]
pub struct RgbaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RgbaColor {
    pub const BLACK: RgbaColor = RgbaColor::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: RgbaColor = RgbaColor::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub fn gray(white: f32) -> Self {
        Self::new(white, white, white, 1.0)
    }

    /// Contrasting color used while a card follows the default: black on a
    /// light background, white on anything else.
    pub fn default_for(background: BackgroundStyle) -> Self {
        if background == BackgroundStyle::Light {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn approx_eq(&self, other: &RgbaColor) -> bool {
        (self.r - other.r).abs() <= COLOR_EPSILON
            && (self.g - other.g).abs() <= COLOR_EPSILON
            && (self.b - other.b).abs() <= COLOR_EPSILON
            && (self.a - other.a).abs() <= COLOR_EPSILON
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec<f32>> for RgbaColor {
    fn from(components: Vec<f32>) -> Self {
        match components.as_slice() {
            [r, g, b, a] => Self::new(
                r.clamp(0.0, 1.0),
                g.clamp(0.0, 1.0),
                b.clamp(0.0, 1.0),
                a.clamp(0.0, 1.0),
            ),
            _ => {
                log::warn!(
                    "Color with {} components is invalid, using white",
                    components.len()
                );
                Self::WHITE
            }
        }
    }
}

impl From<RgbaColor> for [f32; 4] {
    fn from(color: RgbaColor) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

/// A named entry of the color picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayColor {
    pub name: &'static str,
    pub color: RgbaColor,
}

impl DisplayColor {
    /// Picker entries for `background`; the first entry is the default color.
    pub fn presets(background: BackgroundStyle) -> Vec<DisplayColor> {
        let default_name = if background == BackgroundStyle::Light {
            "Black"
        } else {
            "White"
        };
        vec![
            DisplayColor {
                name: default_name,
                color: RgbaColor::default_for(background),
            },
            DisplayColor {
                name: "Blue",
                color: RgbaColor::from_rgb8(0, 122, 255),
            },
            DisplayColor {
                name: "Purple",
                color: RgbaColor::from_rgb8(175, 82, 222),
            },
            DisplayColor {
                name: "Pink",
                color: RgbaColor::from_rgb8(255, 45, 85),
            },
            DisplayColor {
                name: "Green",
                color: RgbaColor::from_rgb8(52, 199, 89),
            },
            DisplayColor {
                name: "Orange",
                color: RgbaColor::from_rgb8(255, 149, 0),
            },
        ]
    }
}

/// Visual preferences that persist per event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    id: Uuid,
    style: TimeDisplayStyle,
    show_percentage: bool,
    display_color: RgbaColor,
    background_style: BackgroundStyle,
    is_using_default_color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            style: TimeDisplayStyle::Grid,
            show_percentage: false,
            display_color: RgbaColor::WHITE,
            background_style: BackgroundStyle::Dark,
            is_using_default_color: true,
        }
    }
}

impl DisplaySettings {
    /// Defaults whose color already contrasts with `effective_background`.
    pub fn for_background(effective_background: BackgroundStyle) -> Self {
        Self {
            display_color: RgbaColor::default_for(effective_background),
            background_style: effective_background,
            ..Self::default()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn style(&self) -> TimeDisplayStyle {
        self.style
    }

    pub fn show_percentage(&self) -> bool {
        self.show_percentage
    }

    pub fn display_color(&self) -> RgbaColor {
        self.display_color
    }

    pub fn background_style(&self) -> BackgroundStyle {
        self.background_style
    }

    pub fn is_using_default_color(&self) -> bool {
        self.is_using_default_color
    }

    pub fn set_style(&mut self, style: TimeDisplayStyle) {
        self.style = style;
    }

    pub fn set_show_percentage(&mut self, show_percentage: bool) {
        self.show_percentage = show_percentage;
    }

    /// Re-derive the default color for `background`.
    ///
    /// Does nothing for cards with a user-chosen color. Returns whether the
    /// color changed; repeated calls converge.
    pub fn update_color(&mut self, background: BackgroundStyle) -> bool {
        if !self.is_using_default_color {
            return false;
        }

        self.background_style = background;
        let new_color = RgbaColor::default_for(background);
        if self.display_color.approx_eq(&new_color) {
            return false;
        }
        self.display_color = new_color;
        true
    }

    /// Apply a color picked by the user. Picking the color that is currently
    /// the default puts the card back on the default rule.
    pub fn select_color(&mut self, color: RgbaColor, effective_background: BackgroundStyle) {
        self.display_color = color;
        self.is_using_default_color = color.approx_eq(&RgbaColor::default_for(effective_background));
    }
}
