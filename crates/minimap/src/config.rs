use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Errors from building a minimap with unusable settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MinimapError {
    #[error("minimum radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("maximum radius {max} is below minimum radius {min}")]
    RadiusRange { min: f32, max: f32 },
    #[error("radar duration must be positive, got {0}")]
    NonPositiveRadarDuration(f32),
    #[error("world-to-map divisor must be positive, got {0}")]
    NonPositiveWorldScale(f32),
    #[error("render resolution must be positive, got {0}")]
    InvalidResolution(Vec2),
}

/// Placement of the fixed HUD sprites, as fractions of the render resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudLayout {
    pub center: Vec2,
    pub background: Vec2,
    pub geometry: Vec2,
    pub border: Vec2,
    pub radar_line: Vec2,
    pub arrow: Vec2,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.9225, 0.865),
            background: Vec2::new(0.135, 0.25),
            geometry: Vec2::new(0.1296, 0.24),
            border: Vec2::new(0.1323, 0.245),
            radar_line: Vec2::new(0.135, 0.25),
            arrow: Vec2::new(0.015, 0.03),
        }
    }
}

/// Base sizes of the dynamic markers, as fractions of the render resolution
/// before the zoom-dependent scalars are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSizes {
    pub boat: Vec2,
    pub key_item: Vec2,
    pub survivor: Vec2,
    pub heat_blip: Vec2,
}

impl Default for MarkerSizes {
    fn default() -> Self {
        Self {
            boat: Vec2::new(0.035, 0.125),
            key_item: Vec2::new(0.057, 0.1),
            survivor: Vec2::new(0.075, 0.1),
            heat_blip: Vec2::new(0.057, 0.1),
        }
    }
}

/// Minimap tuning. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Map radius in map units when fully zoomed in.
    pub min_radius: f32,
    /// Map radius in map units when fully zoomed out.
    pub max_radius: f32,
    /// Seconds a radar ping keeps markers on screen.
    pub radar_duration: f32,
    /// Radar line angular speed in radians per second.
    pub radar_line_speed: f32,
    /// World units per map unit.
    pub world_to_map: f32,
    /// Orthographic half extent per unit of radius.
    pub camera_extent_factor: f32,
    /// Captured canvas edge length per unit of radius.
    pub canvas_factor: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub layout: HudLayout,
    pub markers: MarkerSizes,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            min_radius: 100.0,
            max_radius: 200.0,
            radar_duration: 10.0,
            radar_line_speed: FRAC_PI_2 * 1.5,
            world_to_map: 100.0,
            camera_extent_factor: 210.0,
            canvas_factor: 4.2,
            near_plane: 1.0,
            far_plane: 50_000.0,
            layout: HudLayout::default(),
            markers: MarkerSizes::default(),
        }
    }
}

impl MinimapConfig {
    pub fn validate(&self) -> Result<(), MinimapError> {
        if !is_positive(self.min_radius) {
            return Err(MinimapError::NonPositiveRadius(self.min_radius));
        }
        if self.max_radius.is_nan() || self.max_radius < self.min_radius {
            return Err(MinimapError::RadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !is_positive(self.radar_duration) {
            return Err(MinimapError::NonPositiveRadarDuration(self.radar_duration));
        }
        if !is_positive(self.world_to_map) {
            return Err(MinimapError::NonPositiveWorldScale(self.world_to_map));
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
