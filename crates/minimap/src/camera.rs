use glam::{Mat4, Quat, Vec2};
use std::f32::consts::FRAC_PI_2;

use crate::config::MinimapConfig;

/// Top-down orthographic camera capturing the map geometry around the boat.
///
/// The camera is sized for a map radius; it only changes when the minimap
/// switches between its minimum and maximum radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapCamera {
    radius: f32,
    half_extent: f32,
    dimensions: Vec2,
    near: f32,
    far: f32,
}

impl MinimapCamera {
    pub fn for_radius(radius: f32, config: &MinimapConfig) -> Self {
        Self {
            radius,
            half_extent: radius * config.camera_extent_factor,
            dimensions: Vec2::splat(radius * config.canvas_factor),
            near: config.near_plane,
            far: config.far_plane,
        }
    }

    /// Radius this camera was sized for.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Half the edge length of the orthographic view volume, in world units.
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Size of the captured canvas, in map units.
    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let h = self.half_extent;
        Mat4::orthographic_rh(-h, h, -h, h, self.near, self.far)
    }

    /// Pitched 90 degrees so the -Z forward axis points straight down.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(-FRAC_PI_2)
    }
}
