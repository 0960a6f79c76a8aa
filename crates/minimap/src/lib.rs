//! Minimap HUD: boat-relative markers over a captured top-down map.
//!
//! The minimap keeps the boat at its center and places heat blips, survivors
//! and the key item relative to it. Markers only show while a radar ping is
//! running. Output is a [`MinimapFrame`] of sprite instances that any
//! [`MinimapRenderer`] can draw.
//!
//! # Invariants
//! - A point one radius from the boat lands on the background's edge.
//! - The capture camera only changes when the radius crosses the minimum.
//! - Hidden minimaps produce no frame and ignore time updates.

mod camera;
mod config;
mod event;
mod minimap;
mod radar;
mod renderer;
mod sprite;

pub use camera::MinimapCamera;
pub use config::{HudLayout, MarkerSizes, MinimapConfig, MinimapError};
pub use event::{BoatTransform, HudEvent, HudEventHandler};
pub use minimap::{KeyItemMarker, Minimap, MinimapFrame, RadarLayer};
pub use radar::{CountdownTimer, RadarSweep};
pub use renderer::{MinimapRenderer, TextMinimapRenderer};
pub use sprite::{SpriteInstance, SpriteKind};

pub fn crate_info() -> &'static str {
    "tidewatch-minimap v0.1.0"
}
