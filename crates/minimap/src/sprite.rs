use glam::Vec2;

/// What a sprite instance depicts. Renderers map this to their own textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Background,
    Geometry,
    Border,
    Boat,
    HeatBlip,
    Survivor,
    KeyItem,
    Arrow,
    RadarLine,
}

/// Per-instance draw data handed to the renderer: screen position (pixels),
/// size, rotation (radians) and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    pub position: Vec2,
    pub size: Vec2,
    pub size_multiplier: Vec2,
    pub rotation: f32,
    pub alpha: f32,
    pub hidden: bool,
}

impl Default for SpriteInstance {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            size_multiplier: Vec2::ONE,
            rotation: 0.0,
            alpha: 1.0,
            hidden: false,
        }
    }
}

impl SpriteInstance {
    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    /// Final on-screen size.
    pub fn scaled_size(&self) -> Vec2 {
        self.size * self.size_multiplier
    }

    /// Hidden or fully transparent instances draw nothing.
    pub fn is_drawn(&self) -> bool {
        !self.hidden && self.alpha > 0.0
    }
}
