//! Spatial index over region polygons for cell filtering.

use geo::{BoundingRect, Polygon, PreparedGeometry, Relate};
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::boundary::Region;
use crate::models::Cell;

/// Wrapper for R-tree indexing of one region polygon.
///
/// The polygon is prepared once so its topology graph is reused across every
/// cell relate.
struct IndexedPolygon {
    prepared: PreparedGeometry<'static, Polygon<f64>, f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPolygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedPolygon {
    fn new(polygon: Polygon<f64>) -> Option<Self> {
        let rect = polygon.bounding_rect()?;
        Some(Self {
            prepared: PreparedGeometry::from(polygon),
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

/// R-tree of the polygons making up a region.
pub struct RegionIndex {
    tree: RTree<IndexedPolygon>,
}

impl RegionIndex {
    pub fn build(region: &Region) -> Self {
        let indexed: Vec<IndexedPolygon> = region
            .geometry()
            .iter()
            .cloned()
            .filter_map(IndexedPolygon::new)
            .collect();

        let tree = RTree::bulk_load(indexed);
        debug!("Region index built with {} polygons", tree.size());

        Self { tree }
    }

    /// True when the cell's interior shares area with the region's interior.
    ///
    /// Envelope overlap only selects candidates; a cell that merely touches a
    /// polygon along an edge or at a corner does not count.
    pub fn overlaps(&self, cell: &Cell) -> bool {
        let (min_x, min_y, max_x, max_y) = cell.bounds();
        let query_envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let square = cell.to_polygon();

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .any(|ip| {
                // Interiors meet iff the shapes intersect without merely touching
                let matrix = ip.prepared.relate(&square);
                matrix.is_intersects() && !matrix.is_touches()
            })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon};

    fn region(polys: Vec<Vec<(f64, f64)>>) -> Region {
        let polygons = polys
            .into_iter()
            .map(|ring| Polygon::new(LineString::from(ring), vec![]))
            .collect();
        Region::new(MultiPolygon::new(polygons)).unwrap()
    }

    #[test]
    fn test_two_islands() {
        let index = RegionIndex::build(&region(vec![
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)],
            vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0), (5.0, 5.0)],
        ]));
        assert_eq!(index.len(), 2);
        assert!(index.overlaps(&Cell::new(0.25, 0.25, 0.5)));
        assert!(index.overlaps(&Cell::new(5.5, 5.5, 1.0)));
        assert!(!index.overlaps(&Cell::new(2.0, 2.0, 1.0)));
    }

    #[test]
    fn test_edge_contact_is_not_overlap() {
        let index = RegionIndex::build(&region(vec![vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ]]));
        assert!(!index.overlaps(&Cell::new(1.0, 0.0, 1.0)));
        assert!(!index.overlaps(&Cell::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_repeated_queries_on_concave_polygon() {
        // U shape with the notch at x in [1, 2], y in [1, 3]
        let index = RegionIndex::build(&region(vec![vec![
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
            (0.0, 0.0),
        ]]));
        for _ in 0..3 {
            assert!(index.overlaps(&Cell::new(0.0, 2.0, 1.0)));
            assert!(index.overlaps(&Cell::new(1.0, 0.0, 1.0)));
            assert!(!index.overlaps(&Cell::new(1.0, 1.0, 1.0)));
            assert!(!index.overlaps(&Cell::new(1.25, 2.0, 0.5)));
        }
    }

    #[test]
    fn test_cell_covering_region_overlaps() {
        let index = RegionIndex::build(&region(vec![vec![
            (0.2, 0.2),
            (0.4, 0.2),
            (0.4, 0.4),
            (0.2, 0.2),
        ]]));
        assert!(index.overlaps(&Cell::new(0.0, 0.0, 1.0)));
    }
}
