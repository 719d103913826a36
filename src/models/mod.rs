//! Core value types shared with the rendering layer.

pub mod cell;
pub mod point;

pub use cell::{Cell, CellSet};
pub use point::GeoPoint;
