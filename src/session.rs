//! Interaction state for one marking session.
//!
//! The UI owns a [`Session`] and passes it explicitly; nothing here is global.

use tracing::debug;

use crate::models::GeoPoint;
use crate::registry::PointRegistry;

/// Map center used before anything has been clicked (Yeongcheon city hall).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 35.9749,
    lon: 128.9461,
};

/// State of the most recently clicked point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pending {
    /// Not yet stored; can be confirmed.
    New(GeoPoint),
    /// Already in the registry; confirming is a no-op.
    AlreadySaved(GeoPoint),
}

#[derive(Debug, Clone)]
pub struct Session {
    registry: PointRegistry,
    last_center: GeoPoint,
    pending: Option<GeoPoint>,
}

impl Session {
    pub fn new(registry: PointRegistry) -> Self {
        Self::with_center(registry, DEFAULT_CENTER)
    }

    pub fn with_center(registry: PointRegistry, center: GeoPoint) -> Self {
        Self {
            registry,
            last_center: center,
            pending: None,
        }
    }

    /// Record a map click: the map recenters on it and it becomes pending.
    pub fn click(&mut self, point: GeoPoint) {
        debug!("Clicked {}", point);
        self.last_center = point;
        self.pending = Some(point);
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending.map(|p| {
            if self.registry.contains(&p) {
                Pending::AlreadySaved(p)
            } else {
                Pending::New(p)
            }
        })
    }

    /// Store the pending point and clear it.
    ///
    /// Returns `true` only when a new point was added. A duplicate stays
    /// pending, matching the UI which keeps showing it as already saved.
    pub fn confirm(&mut self) -> bool {
        let Some(point) = self.pending else {
            return false;
        };
        let was_new = self.registry.insert(point);
        if was_new {
            self.pending = None;
        }
        was_new
    }

    pub fn last_center(&self) -> GeoPoint {
        self.last_center
    }

    pub fn registry(&self) -> &PointRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> PointRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let session = Session::new(PointRegistry::new());
        assert_eq!(session.last_center(), DEFAULT_CENTER);
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_click_then_confirm() {
        let mut session = Session::new(PointRegistry::new());
        let p = GeoPoint::new(35.97, 128.95);

        session.click(p);
        assert_eq!(session.last_center(), p);
        assert_eq!(session.pending(), Some(Pending::New(p)));

        assert!(session.confirm());
        assert!(session.pending().is_none());
        assert_eq!(session.registry().len(), 1);
        assert!(!session.confirm());
    }

    #[test]
    fn test_duplicate_click_is_already_saved() {
        let p = GeoPoint::new(35.97, 128.95);
        let registry: PointRegistry = std::iter::once(p).collect();
        let mut session = Session::new(registry);

        session.click(p);
        assert_eq!(session.pending(), Some(Pending::AlreadySaved(p)));
        assert!(!session.confirm());
        assert_eq!(session.registry().len(), 1);
    }
}
