use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Boat pose as published by the boat controller each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatTransform {
    /// World X position.
    pub x: f32,
    /// World Z position (the map's vertical axis).
    pub z: f32,
    /// Heading around the world up axis, in degrees.
    pub yaw_degrees: f32,
    /// Zoom fraction in `[0, 1]` driven by boat speed: 0 is fully zoomed in.
    pub zoom: f32,
}

impl BoatTransform {
    /// Unpack the `(x, yaw, z, zoom)` vector the boat controller sends.
    pub fn from_packed(packed: Vec4) -> Self {
        Self {
            x: packed.x,
            yaw_degrees: packed.y,
            z: packed.z,
            zoom: packed.w,
        }
    }
}

/// Game events the minimap reacts to.
///
/// Delivery (subscription, fan-out) belongs to the game's message bus; the
/// minimap only sees events through [`HudEventHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HudEvent {
    /// Show or hide the HUD.
    ShowHud(bool),
    /// The player's boat moved.
    BoatTransformUpdate(BoatTransform),
    /// A radar ping started; markers fade in and out over the radar duration.
    StartRadarPing,
}

/// Receiver side of the game's message bus.
pub trait HudEventHandler {
    fn handle(&mut self, event: &HudEvent);
}
