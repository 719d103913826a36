//! GeoJSON boundary parsing.
//!
//! The input is validated against a small typed schema: a FeatureCollection,
//! a single Feature, or a bare Polygon/MultiPolygon geometry. Positions are
//! GeoJSON `[lon, lat]` and map directly to `x = lon, y = lat`.

use std::fs;
use std::path::Path;

use geo::{Area, Coord, LineString, MultiPolygon, Polygon};
use hashbrown::HashSet;
use serde::Deserialize;
use tracing::{debug, info};

use super::Region;
use crate::error::{Error, Result};

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<Feature> },
    Feature(Feature),
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
    /// Points, lines and collections carry no area and are skipped.
    #[serde(other)]
    Unsupported,
}

/// Parse a GeoJSON boundary into a [`Region`].
///
/// Fails with [`Error::MalformedBoundary`] if the document does not match the
/// schema or no polygon with a valid exterior ring is found.
pub fn load(source: &str) -> Result<Region> {
    let document: Document = serde_json::from_str(source)
        .map_err(|e| Error::MalformedBoundary(format!("invalid GeoJSON: {}", e)))?;

    let mut polygons = Vec::new();
    match document {
        Document::FeatureCollection { features } => {
            for (i, feature) in features.into_iter().enumerate() {
                collect_feature(i, feature, &mut polygons)?;
            }
        }
        Document::Feature(feature) => collect_feature(0, feature, &mut polygons)?,
        Document::Polygon { coordinates } => collect_polygon(&coordinates, &mut polygons)?,
        Document::MultiPolygon { coordinates } => {
            for rings in &coordinates {
                collect_polygon(rings, &mut polygons)?;
            }
        }
    }

    if polygons.is_empty() {
        return Err(Error::MalformedBoundary(
            "no valid polygon ring found".to_string(),
        ));
    }

    let region = Region::new(MultiPolygon::new(polygons))
        .ok_or_else(|| Error::MalformedBoundary("boundary has no extent".to_string()))?;

    let bbox = region.bbox();
    info!(
        "Loaded boundary with {} polygons, bbox ({}, {}) - ({}, {})",
        region.polygon_count(),
        bbox.min_x,
        bbox.min_y,
        bbox.max_x,
        bbox.max_y
    );

    Ok(region)
}

/// Read and parse a GeoJSON boundary file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Region> {
    let path = path.as_ref();
    info!("Loading boundary from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&content)
}

fn collect_feature(index: usize, feature: Feature, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    match feature.geometry {
        Some(Geometry::Polygon { coordinates }) => collect_polygon(&coordinates, out),
        Some(Geometry::MultiPolygon { coordinates }) => {
            for rings in &coordinates {
                collect_polygon(rings, out)?;
            }
            Ok(())
        }
        Some(Geometry::Unsupported) => {
            debug!("Skipping feature {}: geometry is not areal", index);
            Ok(())
        }
        None => {
            debug!("Skipping feature {}: null geometry", index);
            Ok(())
        }
    }
}

/// First ring is the exterior, the rest are holes.
fn collect_polygon(rings: &[Ring], out: &mut Vec<Polygon<f64>>) -> Result<()> {
    let Some((exterior, interiors)) = rings.split_first() else {
        debug!("Skipping polygon without rings");
        return Ok(());
    };

    let Some(exterior) = build_ring(exterior)? else {
        debug!("Skipping polygon: exterior ring bounds no area");
        return Ok(());
    };

    let mut holes = Vec::with_capacity(interiors.len());
    for ring in interiors {
        match build_ring(ring)? {
            Some(hole) => holes.push(hole),
            None => debug!("Dropping degenerate hole"),
        }
    }

    out.push(Polygon::new(exterior, holes));
    Ok(())
}

/// Build a closed ring. `Ok(None)` means the ring is well-formed JSON but too
/// degenerate to bound an area: fewer than 3 distinct vertices, or all
/// vertices collinear.
fn build_ring(positions: &[Position]) -> Result<Option<LineString<f64>>> {
    let mut coords = Vec::with_capacity(positions.len() + 1);
    for position in positions {
        let (x, y) = match position.as_slice() {
            [x, y, ..] => (*x, *y),
            _ => {
                return Err(Error::MalformedBoundary(format!(
                    "position needs at least 2 numbers, got {}",
                    position.len()
                )))
            }
        };
        if !x.is_finite() || !y.is_finite() {
            return Ok(None);
        }
        coords.push(Coord { x, y });
    }

    let distinct: HashSet<(u64, u64)> = coords
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    if distinct.len() < 3 {
        return Ok(None);
    }

    // Close the ring if needed
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }

    let ring = LineString::new(coords);
    let area = Polygon::new(ring.clone(), vec![]).unsigned_area();
    if !area.is_normal() {
        return Ok(None);
    }

    Ok(Some(ring))
}
