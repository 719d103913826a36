//! Grid cell and cell set types.

use geo_types::{coord, Polygon, Rect};
use serde::Serialize;
use serde_json::{json, Value};

/// A square lattice cell defined by its lower-left corner and side length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Cell {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    /// Bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.size, self.y + self.size)
    }

    pub fn rect(&self) -> Rect<f64> {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.rect().to_polygon()
    }
}

/// Ordered collection of retained cells, x-major then y.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellSet {
    cells: Vec<Cell>,
}

impl CellSet {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    /// GeoJSON FeatureCollection of the cells, for grid overlays.
    pub fn to_feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let (min_x, min_y, max_x, max_y) = cell.bounds();
                json!({
                    "type": "Feature",
                    "properties": { "index": i },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [min_x, min_y],
                            [max_x, min_y],
                            [max_x, max_y],
                            [min_x, max_y],
                            [min_x, min_y],
                        ]],
                    },
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

impl IntoIterator for CellSet {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_bounds() {
        let cell = Cell::new(0.5, 0.0, 0.5);
        assert_eq!(cell.bounds(), (0.5, 0.0, 1.0, 0.5));
    }

    #[test]
    fn test_feature_collection_shape() {
        let set = CellSet::new(vec![Cell::new(0.0, 0.0, 1.0), Cell::new(0.0, 1.0, 1.0)]);
        let fc = set.to_feature_collection();
        assert_eq!(fc["type"], "FeatureCollection");
        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["properties"]["index"], 1);
        let ring = features[1]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[2][1], 2.0);
    }
}
