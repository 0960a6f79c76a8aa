use glam::Vec2;
use std::collections::BTreeMap;
use tidewatch_common::{HeatBlip, HeatmapKind};

use crate::config::PlayAreaConfig;
use crate::grid::{CellCoord, GridError, WorldGrid};

/// Accumulated movement heat for one category, bucketed by a [`WorldGrid`].
///
/// Heat is stored in a buffer parallel to the grid's cells. Samples falling
/// outside the grid are dropped.
#[derive(Debug)]
pub struct Heatmap {
    kind: HeatmapKind,
    grid: WorldGrid,
    heat: Vec<f32>,
}

impl Heatmap {
    pub fn new(kind: HeatmapKind, grid: WorldGrid) -> Self {
        let heat = vec![0.0; grid.cell_count()];
        Self { kind, grid, heat }
    }

    /// Build the grid for `kind` from a play area and wrap it.
    pub fn for_play_area(kind: HeatmapKind, play_area: &PlayAreaConfig) -> Result<Self, GridError> {
        let grid = WorldGrid::new(
            play_area.min_corner(),
            play_area.max_corner(),
            play_area.cell_scale(kind),
        )?;
        Ok(Self::new(kind, grid))
    }

    pub fn kind(&self) -> HeatmapKind {
        self.kind
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Add heat at a world position. Returns the cell that received it, or
    /// `None` if the position is outside the grid. Negative amounts count as zero.
    pub fn record(&mut self, position: Vec2, amount: f32) -> Option<CellCoord> {
        let coord = self.grid.indices_at_position(position)?;
        self.heat[self.grid.flat_index(coord)] += amount.max(0.0);
        Some(coord)
    }

    /// Record the same amount at many positions. Returns how many landed in the grid.
    pub fn record_many(&mut self, positions: impl IntoIterator<Item = Vec2>, amount: f32) -> usize {
        let mut recorded = 0;
        let mut dropped = 0;
        for position in positions {
            if self.record(position, amount).is_some() {
                recorded += 1;
            } else {
                dropped += 1;
            }
        }
        tracing::trace!(kind = %self.kind, recorded, dropped, "heat samples recorded");
        recorded
    }

    /// Scale every cell by `factor`, clamped to `[0, 1]`.
    pub fn decay(&mut self, factor: f32) {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        for value in &mut self.heat {
            *value *= factor;
        }
    }

    /// Heat in a cell. Cells outside the grid have no heat.
    pub fn heat_at(&self, coord: CellCoord) -> f32 {
        self.grid.slot(coord).map_or(0.0, |slot| self.heat[slot])
    }

    /// Heat in the cell owning a world position.
    pub fn sample(&self, position: Vec2) -> f32 {
        self.grid
            .indices_at_position(position)
            .map_or(0.0, |coord| self.heat_at(coord))
    }

    pub fn max_heat(&self) -> f32 {
        self.heat.iter().copied().fold(0.0, f32::max)
    }

    pub fn total_heat(&self) -> f32 {
        self.heat.iter().sum()
    }

    pub fn clear(&mut self) {
        self.heat.fill(0.0);
    }

    /// One blip per warm cell, positioned at the cell center, with heat
    /// normalised against the hottest cell. Cells below `threshold` (after
    /// normalisation) are skipped; a NaN threshold counts as 0. Blips come out
    /// in cell storage order.
    pub fn blips(&self, threshold: f32) -> Vec<HeatBlip> {
        let _span = tracing::info_span!("heatmap_blips", kind = %self.kind).entered();

        let max = self.max_heat();
        if max <= 0.0 {
            return Vec::new();
        }
        let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
        let blips: Vec<HeatBlip> = self
            .grid
            .cells()
            .zip(&self.heat)
            .filter(|(_, heat)| **heat > 0.0)
            .map(|((_, cell), heat)| HeatBlip::new(cell.center(), heat / max))
            .filter(|blip| blip.heat >= threshold)
            .collect();

        tracing::trace!(count = blips.len(), max, "heatmap blips extracted");
        blips
    }
}

/// One heatmap per [`HeatmapKind`], all covering the same play area.
#[derive(Debug)]
pub struct HeatmapSet {
    maps: BTreeMap<HeatmapKind, Heatmap>,
}

impl HeatmapSet {
    /// Build a heatmap for every kind from the play-area config.
    pub fn from_config(play_area: &PlayAreaConfig) -> Result<Self, GridError> {
        let mut maps = BTreeMap::new();
        for kind in HeatmapKind::ALL {
            maps.insert(kind, Heatmap::for_play_area(kind, play_area)?);
        }
        Ok(Self { maps })
    }

    pub fn get(&self, kind: HeatmapKind) -> Option<&Heatmap> {
        self.maps.get(&kind)
    }

    pub fn get_mut(&mut self, kind: HeatmapKind) -> Option<&mut Heatmap> {
        self.maps.get_mut(&kind)
    }

    /// Record heat for one kind. `None` when the position is off-grid.
    pub fn record(&mut self, kind: HeatmapKind, position: Vec2, amount: f32) -> Option<CellCoord> {
        self.maps.get_mut(&kind)?.record(position, amount)
    }

    pub fn decay_all(&mut self, factor: f32) {
        for map in self.maps.values_mut() {
            map.decay(factor);
        }
    }

    /// Blips for one kind, empty if the kind has no heat.
    pub fn blips(&self, kind: HeatmapKind, threshold: f32) -> Vec<HeatBlip> {
        self.get(kind)
            .map(|map| map.blips(threshold))
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeatmapKind, &Heatmap)> + '_ {
        self.maps.iter().map(|(kind, map)| (*kind, map))
    }
}
