use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Integer cell coordinate in a [`WorldGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    /// Sentinel for "position is outside the grid". Never a valid cell since
    /// in-range indices are non-negative.
    pub const OUTSIDE: CellCoord = CellCoord { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_outside(self) -> bool {
        self == Self::OUTSIDE
    }
}

impl From<CellCoord> for IVec2 {
    fn from(coord: CellCoord) -> Self {
        IVec2::new(coord.x, coord.y)
    }
}

/// One axis-aligned square of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub min_point: Vec2,
    pub max_point: Vec2,
}

impl Cell {
    /// Half-open containment: `min <= pos < max` on both axes.
    pub fn contains(&self, position: Vec2) -> bool {
        position.cmpge(self.min_point).all() && position.cmplt(self.max_point).all()
    }

    pub fn center(&self) -> Vec2 {
        (self.min_point + self.max_point) * 0.5
    }
}

/// Errors raised when a grid is asked to cover an invalid play area.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell scale must be positive, got {0}")]
    NonPositiveCellScale(f32),
    #[error("grid input must be finite: min={min}, max={max}, cell_scale={cell_scale}")]
    NonFiniteInput { min: Vec2, max: Vec2, cell_scale: f32 },
    #[error("play area is degenerate or inverted: min={min}, max={max}")]
    DegenerateArea { min: Vec2, max: Vec2 },
    #[error("play area needs {width}x{height} cells, which cannot be indexed")]
    TooManyCells { width: f32, height: f32 },
}

/// Uniform grid tiling a rectangular play area into square cells.
///
/// The cell count along each axis is rounded up to an even number so the
/// grid can be centered symmetrically on the requested area. The footprint
/// therefore always covers, and usually exceeds, the requested rectangle.
///
/// Cells are stored flat, column-major: cell `(x, y)` lives at
/// `x * index_height + y`. Cell edges along an axis are `origin + k * scale`,
/// shared by neighbouring cells, so the cells tile without gaps or overlap.
/// The grid never changes after construction and is not `Clone`; lend it by
/// reference.
#[derive(Debug)]
pub struct WorldGrid {
    cell_scale: f32,
    origin: Vec2,
    index_width: i32,
    index_height: i32,
    cells: Vec<Cell>,
}

impl WorldGrid {
    /// Upper bound on the number of cells a grid may hold (4 GiB of cells).
    pub const MAX_CELLS: usize = 1 << 28;

    /// Build a grid covering the rectangle `min_corner..max_corner`.
    pub fn new(min_corner: Vec2, max_corner: Vec2, cell_scale: f32) -> Result<Self, GridError> {
        let dims = Self::validate(min_corner, max_corner, cell_scale)?;
        let (index_width, index_height) = (dims.x, dims.y);

        // Centered on the requested area, not on the rounded footprint.
        let extents = max_corner - min_corner;
        let center = min_corner + extents * 0.5;
        let origin = center - dims.as_vec2() * 0.5 * cell_scale;

        let too_many = GridError::TooManyCells {
            width: index_width as f32,
            height: index_height as f32,
        };
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(index_width as usize * index_height as usize)
            .map_err(|_| too_many)?;
        for x in 0..index_width {
            let (min_x, max_x) = (
                axis_edge(origin.x, cell_scale, x),
                axis_edge(origin.x, cell_scale, x + 1),
            );
            for y in 0..index_height {
                cells.push(Cell {
                    min_point: Vec2::new(min_x, axis_edge(origin.y, cell_scale, y)),
                    max_point: Vec2::new(max_x, axis_edge(origin.y, cell_scale, y + 1)),
                });
            }
        }

        tracing::debug!(
            index_width,
            index_height,
            cell_scale,
            ?origin,
            "world grid built"
        );

        Ok(Self {
            cell_scale,
            origin,
            index_width,
            index_height,
            cells,
        })
    }

    /// Check construction parameters and return the even-rounded index
    /// dimensions without allocating any cells.
    pub fn validate(min_corner: Vec2, max_corner: Vec2, cell_scale: f32) -> Result<IVec2, GridError> {
        if !min_corner.is_finite() || !max_corner.is_finite() || !cell_scale.is_finite() {
            return Err(GridError::NonFiniteInput {
                min: min_corner,
                max: max_corner,
                cell_scale,
            });
        }
        if cell_scale <= 0.0 {
            return Err(GridError::NonPositiveCellScale(cell_scale));
        }
        let extents = max_corner - min_corner;
        if extents.x <= 0.0 || extents.y <= 0.0 {
            return Err(GridError::DegenerateArea {
                min: min_corner,
                max: max_corner,
            });
        }

        let raw = (extents / cell_scale).trunc();
        let limit = (i32::MAX - 2) as f32;
        if raw.x >= limit || raw.y >= limit {
            return Err(GridError::TooManyCells {
                width: raw.x,
                height: raw.y,
            });
        }
        let dims = IVec2::new(even_cell_count(raw.x as i32), even_cell_count(raw.y as i32));
        let max_cells = Self::MAX_CELLS.min(isize::MAX as usize / std::mem::size_of::<Cell>());
        let count = (dims.x as usize).checked_mul(dims.y as usize);
        if count.is_none_or(|count| count > max_cells) {
            return Err(GridError::TooManyCells {
                width: dims.x as f32,
                height: dims.y as f32,
            });
        }
        Ok(dims)
    }

    /// Number of cells along each axis. Both components are even and >= 2.
    pub fn index_dimensions(&self) -> IVec2 {
        IVec2::new(self.index_width, self.index_height)
    }

    /// Size of the footprint actually covered by the cells.
    pub fn world_dimensions(&self) -> Vec2 {
        (self.last_cell().max_point - self.first_cell().min_point).abs()
    }

    /// Center of the rounded footprint. May differ slightly from the center
    /// of the requested area.
    pub fn world_center_point(&self) -> Vec2 {
        self.first_cell().min_point + self.world_dimensions() * 0.5
    }

    /// Cell owning `position`, or `None` when it lies outside the grid.
    ///
    /// Agrees with [`Cell::contains`]: the returned cell satisfies
    /// `min_point <= position < max_point`.
    pub fn indices_at_position(&self, position: Vec2) -> Option<CellCoord> {
        let x = axis_index(position.x, self.origin.x, self.cell_scale, self.index_width)?;
        let y = axis_index(position.y, self.origin.y, self.cell_scale, self.index_height)?;
        Some(CellCoord::new(x, y))
    }

    /// Same as [`indices_at_position`](Self::indices_at_position) but reports
    /// out-of-grid positions with [`CellCoord::OUTSIDE`].
    pub fn indices_at_position_or_outside(&self, position: Vec2) -> CellCoord {
        self.indices_at_position(position).unwrap_or(CellCoord::OUTSIDE)
    }

    pub fn cell_scale(&self) -> f32 {
        self.cell_scale
    }

    /// Bottom-left corner of cell `(0, 0)`.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.slot(coord).map(|i| &self.cells[i])
    }

    /// World-space center of a cell.
    pub fn cell_center(&self, coord: CellCoord) -> Option<Vec2> {
        self.cell(coord).map(Cell::center)
    }

    /// All cells with their coordinates, in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        let height = self.index_height as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (CellCoord::new((i / height) as i32, (i % height) as i32), cell)
        })
    }

    /// Cells within a square radius (in cells) of `center`, clipped to the grid.
    pub fn neighbors(&self, center: CellCoord, radius: i32) -> Vec<CellCoord> {
        let mut result = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let coord = CellCoord::new(center.x + dx, center.y + dy);
                if self.contains_coord(coord) {
                    result.push(coord);
                }
            }
        }
        result
    }

    pub fn contains_coord(&self, coord: CellCoord) -> bool {
        (0..self.index_width).contains(&coord.x) && (0..self.index_height).contains(&coord.y)
    }

    /// Flat storage index of a cell.
    pub(crate) fn slot(&self, coord: CellCoord) -> Option<usize> {
        self.contains_coord(coord).then(|| self.flat_index(coord))
    }

    /// Flat storage index of a coordinate already known to be in the grid.
    pub(crate) fn flat_index(&self, coord: CellCoord) -> usize {
        coord.x as usize * self.index_height as usize + coord.y as usize
    }

    // Construction guarantees at least 2x2 cells.
    fn first_cell(&self) -> &Cell {
        &self.cells[0]
    }

    fn last_cell(&self) -> &Cell {
        &self.cells[self.cells.len() - 1]
    }
}

/// Position of the `k`-th cell edge along one axis. Construction and lookup
/// both go through here so they agree bit for bit.
fn axis_edge(origin: f32, cell_scale: f32, k: i32) -> f32 {
    origin + k as f32 * cell_scale
}

/// Index of the cell along one axis with `edge(k) <= p < edge(k + 1)`.
fn axis_index(p: f32, origin: f32, cell_scale: f32, count: i32) -> Option<i32> {
    let edge = |k: i32| axis_edge(origin, cell_scale, k);
    if p.is_nan() || p < edge(0) || p >= edge(count) {
        return None;
    }
    // The division can land one cell off near an edge; settle against the
    // stored edges.
    let mut k = ((p - origin) / cell_scale).floor().clamp(0.0, (count - 1) as f32) as i32;
    while k > 0 && p < edge(k) {
        k -= 1;
    }
    while k + 1 < count && p >= edge(k + 1) {
        k += 1;
    }
    Some(k)
}

/// Odd counts gain one cell, even counts gain two, so the result is always
/// even and strictly larger than the truncated count.
fn even_cell_count(raw: i32) -> i32 {
    if raw % 2 == 1 { raw + 1 } else { raw + 2 }
}
