//! Deduplicated crosswalk point set.

use hashbrown::HashSet;

use crate::models::GeoPoint;

/// Insertion-ordered set of crosswalk points.
///
/// Membership is exact value equality on `(lat, lon)`. Points are not checked
/// against any boundary.
#[derive(Debug, Clone, Default)]
pub struct PointRegistry {
    points: Vec<GeoPoint>,
    seen: HashSet<(u64, u64)>,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point, returning `false` if it was already present.
    pub fn insert(&mut self, point: GeoPoint) -> bool {
        if !self.seen.insert(point.key()) {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Consume the registry and return it with `point` added, plus whether
    /// the point was new.
    pub fn register(mut self, point: GeoPoint) -> (Self, bool) {
        let was_new = self.insert(point);
        (self, was_new)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.seen.contains(&point.key())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.points.iter()
    }
}

impl FromIterator<GeoPoint> for PointRegistry {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        let mut registry = Self::new();
        for point in iter {
            registry.insert(point);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        let p = GeoPoint::new(35.9749, 128.9461);
        let (registry, was_new) = PointRegistry::new().register(p);
        assert!(was_new);
        assert_eq!(registry.len(), 1);

        let (registry, was_new) = registry.register(p);
        assert!(!was_new);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_no_tolerance() {
        let mut registry = PointRegistry::new();
        assert!(registry.insert(GeoPoint::new(35.9749, 128.9461)));
        assert!(registry.insert(GeoPoint::new(35.974900000001, 128.9461)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_insertion_order_kept() {
        let registry: PointRegistry = [
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(3.0, 3.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            registry.points(),
            &[GeoPoint::new(2.0, 2.0), GeoPoint::new(1.0, 1.0), GeoPoint::new(3.0, 3.0)]
        );
    }

    #[test]
    fn test_any_point_accepted() {
        let mut registry = PointRegistry::new();
        assert!(registry.insert(GeoPoint::new(-89.0, 179.0)));
        assert!(registry.contains(&GeoPoint::new(-89.0, 179.0)));
    }
}
