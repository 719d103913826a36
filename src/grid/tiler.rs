//! Bounding-box lattice generation filtered by region geometry.

use tracing::{debug, info};

use super::RegionIndex;
use crate::boundary::Region;
use crate::error::{Error, Result};
use crate::models::{Cell, CellSet};

/// Upper bound on lattice candidates unless overridden.
pub const DEFAULT_MAX_CELLS: usize = 1_000_000;

/// Tiles a region's bounding box with square cells and keeps the cells that
/// overlap the region.
///
/// The lattice is anchored at the bounding-box minimum corner, so results are
/// only comparable between calls on the same region.
#[derive(Debug, Clone, Copy)]
pub struct GridTiler {
    max_cells: usize,
}

impl Default for GridTiler {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl GridTiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject lattices with more than `max_cells` candidates.
    pub fn with_max_cells(max_cells: usize) -> Self {
        Self { max_cells }
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Produce the cells of side `grid_size` that overlap `region`.
    ///
    /// Cells are emitted x-major, then y. A degenerate bounding box yields an
    /// empty set. A `grid_size` larger than the box yields the single cell at
    /// the minimum corner.
    pub fn tile(&self, region: &Region, grid_size: f64) -> Result<CellSet> {
        if !grid_size.is_finite() || grid_size <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "grid size must be a positive finite number, got {}",
                grid_size
            )));
        }

        let bbox = region.bbox();
        if bbox.is_degenerate() {
            debug!("Bounding box is degenerate, no cells");
            return Ok(CellSet::default());
        }

        let columns = (bbox.width() / grid_size).ceil();
        let rows = (bbox.height() / grid_size).ceil();
        let candidates = columns * rows;
        if candidates > self.max_cells as f64 {
            return Err(Error::InvalidParameter(format!(
                "grid size {} yields about {} cells, limit is {}",
                grid_size, candidates, self.max_cells
            )));
        }

        let index = RegionIndex::build(region);
        let mut cells = Vec::new();
        let mut scanned = 0usize;

        // Corners come from integer steps so they stay exactly on min + k * size.
        let mut i = 0u64;
        loop {
            let x = bbox.min_x + i as f64 * grid_size;
            if x >= bbox.max_x {
                break;
            }
            let mut j = 0u64;
            loop {
                let y = bbox.min_y + j as f64 * grid_size;
                if y >= bbox.max_y {
                    break;
                }
                let cell = Cell::new(x, y, grid_size);
                scanned += 1;
                if index.overlaps(&cell) {
                    cells.push(cell);
                }
                j += 1;
            }
            i += 1;
        }

        info!(
            "Tiled region at {}: kept {} of {} cells",
            grid_size,
            cells.len(),
            scanned
        );

        Ok(CellSet::new(cells))
    }
}

/// Tile with the default cell limit.
pub fn tile(region: &Region, grid_size: f64) -> Result<CellSet> {
    GridTiler::default().tile(region, grid_size)
}
