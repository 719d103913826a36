//! Boundary loading.
//!
//! Parses a municipal boundary from GeoJSON into an immutable [`Region`]
//! that the grid tiler and the UI read from.

mod loader;
mod region;

pub use loader::{load, load_file};
pub use region::{BoundingBox, Region};
