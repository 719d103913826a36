//! Crosswalk point value type.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon) marking a crosswalk.
///
/// Equality is exact on both components; there is no snapping or tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Key used for hashed membership. `-0.0` folds into `0.0` so that the key
    /// agrees with `==` for finite coordinates. NaN keys compare by bit
    /// pattern, so a repeated NaN point counts as a duplicate.
    pub(crate) fn key(&self) -> (u64, u64) {
        (normalize(self.lat).to_bits(), normalize(self.lon).to_bits())
    }

    /// Convert to a `geo` point (x = lon, y = lat).
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

fn normalize(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_zero_shares_key() {
        let a = GeoPoint::new(0.0, 128.5);
        let b = GeoPoint::new(-0.0, 128.5);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_is_finite() {
        assert!(GeoPoint::new(35.9, 128.9).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 128.9).is_finite());
        assert!(!GeoPoint::new(35.9, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_geo_conversion_swaps_axes() {
        let p = GeoPoint::new(35.97, 128.94);
        let g = p.to_geo();
        assert_eq!(g.x(), 128.94);
        assert_eq!(g.y(), 35.97);
        assert_eq!(GeoPoint::from(g), p);
    }

    #[test]
    fn test_display_six_decimals() {
        let p = GeoPoint::new(35.9749, 128.9461);
        assert_eq!(p.to_string(), "35.974900, 128.946100");
    }
}
