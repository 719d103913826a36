//! Crosswalk - boundary-constrained grid tiling and crosswalk point registry
//!
//! This library provides the geometric core used by the marking UI and the
//! `crosswalk` command-line tool.

pub mod boundary;
pub mod error;
pub mod grid;
pub mod models;
pub mod registry;
pub mod session;

pub use boundary::{BoundingBox, Region};
pub use error::{Error, Result};
pub use models::{Cell, CellSet, GeoPoint};
pub use registry::{PointRegistry, PointStore};
pub use session::{Pending, Session};
