//! View-facing state: per-card numbers, the grid highlight and the
//! controller tying them to the event store.

mod controller;
mod highlight;
mod metrics;

pub use controller::{CardView, Sheet, TrackEventError, TrackerController};
pub use highlight::{GridHighlight, HighlightState, HIGHLIGHT_DURATION};
pub use metrics::{CardMetrics, GridCell, GRID_COLUMNS, MIN_RING_FRACTION, REMAINING_OPACITY};
