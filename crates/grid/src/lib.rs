//! World grid: uniform spatial partition of the play area, movement heatmaps.
//!
//! # Invariants
//! - Index dimensions are always even and at least 2 on each axis.
//! - A grid never changes after construction; queries are pure reads.
//! - Positions map to cells with half-open intervals; off-grid positions map
//!   to `None` (or the `(-1, -1)` sentinel).

pub mod config;
pub mod grid;
pub mod heatmap;

pub use config::{ConfigError, PlayAreaConfig};
pub use grid::{Cell, CellCoord, GridError, WorldGrid};
pub use heatmap::{Heatmap, HeatmapSet};

pub fn crate_info() -> &'static str {
    "tidewatch-grid v0.1.0"
}
