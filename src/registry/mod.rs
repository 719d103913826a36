//! Crosswalk point registration and persistence.

mod points;
mod store;

pub use points::PointRegistry;
pub use store::PointStore;
