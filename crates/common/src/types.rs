use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Category of movement tracked by a heatmap.
///
/// Each category gets its own grid, so the cell scale can differ per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapKind {
    /// Enemy boats. Shown on the minimap.
    EnemyMovement,
    /// The leviathan. Shown on the minimap.
    LeviathanMovement,
    /// The player's boat. Sampled by gameplay code only (AI, leviathan hunting).
    BoatMovement,
}

impl HeatmapKind {
    pub const ALL: [HeatmapKind; 3] = [
        HeatmapKind::EnemyMovement,
        HeatmapKind::LeviathanMovement,
        HeatmapKind::BoatMovement,
    ];

    /// Cell edge length in world units used when no override is configured.
    pub fn default_cell_scale(self) -> f32 {
        match self {
            HeatmapKind::EnemyMovement => 100.0,
            HeatmapKind::LeviathanMovement => 120.0,
            HeatmapKind::BoatMovement => 1000.0,
        }
    }

    /// Whether blips of this kind are drawn on the minimap.
    pub fn shown_on_minimap(self) -> bool {
        !matches!(self, HeatmapKind::BoatMovement)
    }
}

impl std::fmt::Display for HeatmapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HeatmapKind::EnemyMovement => "enemy_movement",
            HeatmapKind::LeviathanMovement => "leviathan_movement",
            HeatmapKind::BoatMovement => "boat_movement",
        };
        f.write_str(name)
    }
}

/// A single heat sample handed to the minimap: a world position and a heat
/// value normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatBlip {
    pub position: Vec2,
    pub heat: f32,
}

impl HeatBlip {
    pub fn new(position: Vec2, heat: f32) -> Self {
        Self { position, heat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_scales() {
        assert_eq!(HeatmapKind::EnemyMovement.default_cell_scale(), 100.0);
        assert_eq!(HeatmapKind::LeviathanMovement.default_cell_scale(), 120.0);
        assert_eq!(HeatmapKind::BoatMovement.default_cell_scale(), 1000.0);
    }

    #[test]
    fn boat_movement_is_not_drawn() {
        assert!(HeatmapKind::EnemyMovement.shown_on_minimap());
        assert!(HeatmapKind::LeviathanMovement.shown_on_minimap());
        assert!(!HeatmapKind::BoatMovement.shown_on_minimap());
    }

    #[test]
    fn display_matches_serde_name() {
        for kind in HeatmapKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
            let back: HeatmapKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(HeatmapKind::LeviathanMovement.to_string(), "leviathan_movement");
    }
}
