//! Loaded boundary region.

use geo::{BoundingRect, Centroid, Contains, Intersects, MultiPolygon};
use serde::Serialize;

use crate::models::GeoPoint;

/// Bounding box in region coordinates (x = lon, y = lat).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the box has no area in at least one dimension.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

/// Municipal boundary as a multipolygon with its bounding box.
///
/// Immutable once loaded. Coordinates are stored x = longitude, y = latitude.
#[derive(Debug, Clone)]
pub struct Region {
    geometry: MultiPolygon<f64>,
    bbox: BoundingBox,
}

impl Region {
    /// Build a region from a non-empty multipolygon. Returns `None` when the
    /// geometry has no bounding box.
    pub fn new(geometry: MultiPolygon<f64>) -> Option<Self> {
        let rect = geometry.bounding_rect()?;
        let bbox = BoundingBox {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        };
        Some(Self { geometry, bbox })
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn polygon_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// Strict containment; points on the boundary line are not contained.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.geometry.contains(&point.to_geo())
    }

    /// Containment including the boundary line.
    pub fn covers(&self, point: &GeoPoint) -> bool {
        self.geometry.intersects(&point.to_geo())
    }

    pub fn centroid(&self) -> Option<GeoPoint> {
        self.geometry.centroid().map(GeoPoint::from)
    }

    /// Rings as `(lat, lon)` sequences for drawing the outline.
    ///
    /// Exterior rings come first for each polygon, followed by its holes.
    pub fn outline(&self) -> Vec<Vec<GeoPoint>> {
        self.geometry
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
            .map(|ring| ring.coords().map(|c| GeoPoint::new(c.y, c.x)).collect())
            .collect()
    }
}
