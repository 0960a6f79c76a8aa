//! Shared value types used by the world grid, heatmaps and the minimap HUD.

pub mod math;
pub mod types;

pub use math::{lerp, round_to};
pub use types::{HeatBlip, HeatmapKind};

pub fn crate_info() -> &'static str {
    "tidewatch-common v0.1.0"
}
