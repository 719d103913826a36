//! Boundary-constrained grid generation.
//!
//! Lays a square lattice over a region's bounding box and keeps the cells
//! whose interior overlaps the region, using an R-tree over the region's
//! polygons to find candidates.

mod index;
mod tiler;

pub use index::RegionIndex;
pub use tiler::{tile, GridTiler, DEFAULT_MAX_CELLS};
