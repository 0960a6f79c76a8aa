use std::fmt::Write;

use crate::minimap::MinimapFrame;
use crate::sprite::SpriteKind;

/// Backend-agnostic minimap drawing. Renderers only read the frame.
pub trait MinimapRenderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one minimap frame.
    fn render(&self, frame: &MinimapFrame<'_>) -> Self::Output;
}

/// Plain-text renderer for the CLI and tests. Lists every drawn sprite with
/// its screen placement.
#[derive(Debug, Default)]
pub struct TextMinimapRenderer;

impl TextMinimapRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn label(kind: SpriteKind) -> &'static str {
    match kind {
        SpriteKind::Background => "background",
        SpriteKind::Geometry => "geometry",
        SpriteKind::Border => "border",
        SpriteKind::Boat => "boat",
        SpriteKind::HeatBlip => "heat_blip",
        SpriteKind::Survivor => "survivor",
        SpriteKind::KeyItem => "key_item",
        SpriteKind::Arrow => "arrow",
        SpriteKind::RadarLine => "radar_line",
    }
}

impl MinimapRenderer for TextMinimapRenderer {
    type Output = String;

    fn render(&self, frame: &MinimapFrame<'_>) -> String {
        let mut out = String::new();
        let p = frame.map_params;
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Minimap (radar={}) ===",
            if frame.radar.is_some() { "on" } else { "off" }
        );
        let _ = writeln!(
            out,
            "map_params=({:.3}, {:.3}, {:.3}, {:.3})",
            p.x, p.y, p.z, p.w
        );

        let sprites = frame.drawn_sprites();
        let _ = writeln!(out, "Sprites: {}", sprites.len());
        for (kind, sprite) in sprites {
            let size = sprite.scaled_size();
            let _ = writeln!(
                out,
                "  {:<10} pos=({:.1}, {:.1}) size=({:.1}, {:.1}) rot={:.2} alpha={:.2}",
                label(kind),
                sprite.position.x,
                sprite.position.y,
                size.x,
                size.y,
                sprite.rotation,
                sprite.alpha
            );
        }
        out
    }
}
