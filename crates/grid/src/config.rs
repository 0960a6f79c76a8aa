use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tidewatch_common::HeatmapKind;

use crate::grid::{GridError, WorldGrid};

/// Errors from loading a play-area description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {kind} grid: {source}")]
    InvalidGrid {
        kind: HeatmapKind,
        #[source]
        source: GridError,
    },
}

/// The rectangle a level asks its heatmaps to cover, plus optional per-kind
/// cell scale overrides.
///
/// ```yaml
/// min: [-20000.0, -20000.0]
/// max: [20000.0, 20000.0]
/// cell_scales:
///   leviathan_movement: 150.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayAreaConfig {
    pub min: [f32; 2],
    pub max: [f32; 2],
    #[serde(default)]
    pub cell_scales: BTreeMap<HeatmapKind, f32>,
}

impl PlayAreaConfig {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.to_array(),
            max: max.to_array(),
            cell_scales: BTreeMap::new(),
        }
    }

    pub fn with_cell_scale(mut self, kind: HeatmapKind, cell_scale: f32) -> Self {
        self.cell_scales.insert(kind, cell_scale);
        self
    }

    pub fn min_corner(&self) -> Vec2 {
        Vec2::from_array(self.min)
    }

    pub fn max_corner(&self) -> Vec2 {
        Vec2::from_array(self.max)
    }

    /// Configured cell scale for `kind`, falling back to the kind's default.
    pub fn cell_scale(&self, kind: HeatmapKind) -> f32 {
        self.cell_scales
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_cell_scale())
    }

    /// Check that every heatmap kind would get a valid grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in HeatmapKind::ALL {
            WorldGrid::validate(self.min_corner(), self.max_corner(), self.cell_scale(kind))
                .map_err(|source| ConfigError::InvalidGrid { kind, source })?;
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading play area config");
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&data)
    }

    /// Write the config as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_not_overridden() {
        let config = PlayAreaConfig::new(Vec2::ZERO, Vec2::splat(950.0));
        assert_eq!(config.cell_scale(HeatmapKind::EnemyMovement), 100.0);
        assert_eq!(config.cell_scale(HeatmapKind::BoatMovement), 1000.0);

        let config = config.with_cell_scale(HeatmapKind::EnemyMovement, 50.0);
        assert_eq!(config.cell_scale(HeatmapKind::EnemyMovement), 50.0);
        assert_eq!(config.cell_scale(HeatmapKind::LeviathanMovement), 120.0);
    }

    #[test]
    fn parse_yaml_with_overrides() {
        let yaml = r#"
min: [-500.0, -250.0]
max: [500.0, 250.0]
cell_scales:
  leviathan_movement: 150.0
"#;
        let config = PlayAreaConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.min_corner(), Vec2::new(-500.0, -250.0));
        assert_eq!(config.max_corner(), Vec2::new(500.0, 250.0));
        assert_eq!(config.cell_scale(HeatmapKind::LeviathanMovement), 150.0);
        assert_eq!(config.cell_scale(HeatmapKind::EnemyMovement), 100.0);
    }

    #[test]
    fn parse_yaml_without_overrides() {
        let config = PlayAreaConfig::from_yaml_str("min: [0, 0]\nmax: [10, 10]\n").unwrap();
        assert!(config.cell_scales.is_empty());
    }

    #[test]
    fn invalid_scale_is_reported_with_kind() {
        let yaml = "min: [0, 0]\nmax: [10, 10]\ncell_scales:\n  boat_movement: 0.0\n";
        let err = PlayAreaConfig::from_yaml_str(yaml).unwrap_err();
        match err {
            ConfigError::InvalidGrid { kind, source } => {
                assert_eq!(kind, HeatmapKind::BoatMovement);
                assert_eq!(source, GridError::NonPositiveCellScale(0.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inverted_area_is_rejected() {
        let err = PlayAreaConfig::from_yaml_str("min: [10, 10]\nmax: [0, 0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGrid { .. }));
    }

    #[test]
    fn oversized_area_fails_validation() {
        let err = PlayAreaConfig::from_yaml_str("min: [0, 0]\nmax: [2.0e9, 2.0e9]\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidGrid {
                source: GridError::TooManyCells { .. },
                ..
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = PlayAreaConfig::from_yaml_str("min: nope").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = PlayAreaConfig::new(Vec2::new(-100.0, -100.0), Vec2::new(900.0, 400.0))
            .with_cell_scale(HeatmapKind::BoatMovement, 250.0);
        config.save(tmp.path()).unwrap();

        let loaded = PlayAreaConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlayAreaConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
