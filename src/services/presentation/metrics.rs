//! Derived numbers shown on a countdown card.
//!
//! Everything here is a pure function of [`ProgressDetails`], so renderers
//! can recompute it every frame.

use chrono::{Duration, NaiveDate};

use crate::models::display::RgbaColor;
use crate::models::event::ProgressDetails;

/// Days per row in the grid style.
pub const GRID_COLUMNS: usize = 20;

/// Smallest visible arc of the ring style, so an untouched ring still shows.
pub const MIN_RING_FRACTION: f64 = 0.001;

/// Opacity of days that are still ahead in the grid and of ring/bar tracks.
pub const REMAINING_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMetrics {
    progress: ProgressDetails,
}

impl CardMetrics {
    pub fn new(progress: ProgressDetails) -> Self {
        Self { progress }
    }

    pub fn days_left(&self) -> i64 {
        self.progress.days_left
    }

    pub fn total_days(&self) -> i64 {
        self.progress.total_days
    }

    pub fn days_spent(&self) -> i64 {
        (self.progress.total_days - self.progress.days_left).max(0)
    }

    fn denominator(&self) -> f64 {
        self.progress.total_days.max(1) as f64
    }

    pub fn percentage_left(&self) -> f64 {
        self.days_left() as f64 / self.denominator() * 100.0
    }

    pub fn percentage_spent(&self) -> f64 {
        self.days_spent() as f64 / self.denominator() * 100.0
    }

    /// Days left, or days already spent when the card is flipped.
    pub fn counter(&self, showing_days_left: bool) -> i64 {
        if showing_days_left {
            self.days_left()
        } else {
            self.days_spent()
        }
    }

    pub fn percentage_text(&self, showing_days_left: bool) -> String {
        let percentage = if showing_days_left {
            self.percentage_left()
        } else {
            self.percentage_spent()
        };
        format!("{:.0}%", percentage)
    }

    /// Footer value: the day count, or the rounded percentage.
    pub fn counter_text(&self, showing_days_left: bool, show_percentage: bool) -> String {
        if show_percentage {
            self.percentage_text(showing_days_left)
        } else {
            self.counter(showing_days_left).to_string()
        }
    }

    /// Footer caption next to the value, e.g. "days left", "day in", or just
    /// "left" when a percentage is shown.
    pub fn counter_label(&self, showing_days_left: bool, show_percentage: bool) -> String {
        let direction = if showing_days_left { "left" } else { "in" };
        if show_percentage {
            return direction.to_string();
        }

        let unit = if self.counter(showing_days_left) == 1 {
            "day"
        } else {
            "days"
        };
        format!("{unit} {direction}")
    }

    /// Filled share of the ring style.
    pub fn ring_fraction(&self) -> f64 {
        (self.days_spent() as f64 / self.denominator()).clamp(MIN_RING_FRACTION, 1.0)
    }

    /// Filled share of the progress bar style.
    pub fn bar_fraction(&self) -> f64 {
        (self.days_spent() as f64 / self.denominator()).clamp(0.0, 1.0)
    }

    /// One cell per day of the span, laid out row-major in
    /// [`GRID_COLUMNS`] columns; cell `i` stands for `first_day + i`.
    pub fn grid_cells(&self, first_day: NaiveDate) -> Vec<GridCell> {
        let total = usize::try_from(self.progress.total_days).unwrap_or(0);
        (0..total)
            .filter_map(|index| self.grid_cell(first_day, index))
            .collect()
    }

    /// The single cell at `index`, or `None` past the end of the span.
    pub fn grid_cell(&self, first_day: NaiveDate, index: usize) -> Option<GridCell> {
        let total = usize::try_from(self.progress.total_days).unwrap_or(0);
        if index >= total {
            return None;
        }
        let spent = usize::try_from(self.days_spent()).unwrap_or(0);
        let date = i64::try_from(index)
            .ok()
            .and_then(|days| first_day.checked_add_signed(Duration::days(days)));

        Some(GridCell {
            index,
            row: index / GRID_COLUMNS,
            column: index % GRID_COLUMNS,
            date,
            elapsed: index < spent,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub date: Option<NaiveDate>,
    pub elapsed: bool,
}

impl GridCell {
    /// Fill for this cell: elapsed or highlighted days use the card color,
    /// days still ahead are faded.
    pub fn fill(&self, color: RgbaColor, highlighted: bool) -> RgbaColor {
        if self.elapsed || highlighted {
            color
        } else {
            color.with_alpha(color.a * REMAINING_OPACITY)
        }
    }
}
