//! CSV persistence for the point registry.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{info, warn};

use super::PointRegistry;
use crate::error::{Error, Result};
use crate::models::GeoPoint;

const BOM: &str = "\u{feff}";

/// Header names accepted for the latitude column besides the configured one.
const LATITUDE_ALIASES: &[&str] = &["위도", "latitude", "lat"];
const LONGITUDE_ALIASES: &[&str] = &["경도", "longitude", "lon", "lng"];

/// Two-column CSV file holding crosswalk points.
#[derive(Debug, Clone)]
pub struct PointStore {
    path: PathBuf,
    latitude_column: String,
    longitude_column: String,
    bom: bool,
}

impl PointStore {
    /// Store with the default `위도`/`경도` headers and a UTF-8 BOM.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            latitude_column: "위도".to_string(),
            longitude_column: "경도".to_string(),
            bom: true,
        }
    }

    pub fn with_columns(mut self, latitude: &str, longitude: &str) -> Self {
        self.latitude_column = latitude.to_string();
        self.longitude_column = longitude.to_string();
        self
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored points.
    ///
    /// A missing file or a file without recognizable columns gives an empty
    /// registry; malformed rows are errors.
    pub fn load(&self) -> Result<PointRegistry> {
        if !self.path.exists() {
            info!(
                "No point file at {}, starting empty",
                self.path.display()
            );
            return Ok(PointRegistry::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        let content = content.strip_prefix(BOM).unwrap_or(&content);

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());
        let headers = csv_reader.headers()?.clone();

        // Find column indices
        let lat_idx = find_column(&headers, &self.latitude_column, LATITUDE_ALIASES);
        let lon_idx = find_column(&headers, &self.longitude_column, LONGITUDE_ALIASES);
        let (lat_idx, lon_idx) = match (lat_idx, lon_idx) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                warn!(
                    "{} has no '{}'/'{}' columns, starting empty",
                    self.path.display(),
                    self.latitude_column,
                    self.longitude_column
                );
                return Ok(PointRegistry::new());
            }
        };

        let mut registry = PointRegistry::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let lat = parse_field(&record, lat_idx, line)?;
            let lon = parse_field(&record, lon_idx, line)?;
            registry.insert(GeoPoint::new(lat, lon));
        }

        info!(
            "Loaded {} points from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    /// Overwrite the file with every point in registry order.
    ///
    /// Non-finite coordinates cannot be read back, so they are rejected before
    /// the existing file is touched.
    pub fn save(&self, registry: &PointRegistry) -> Result<()> {
        for (i, point) in registry.iter().enumerate() {
            if !point.is_finite() {
                return Err(Error::InvalidRecord {
                    // Header is line 1
                    line: i as u64 + 2,
                    reason: format!("({}, {}) is not finite", point.lat, point.lon),
                });
            }
        }

        let io_err = |source: std::io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = File::create(&self.path).map_err(io_err)?;
        if self.bom {
            file.write_all(BOM.as_bytes()).map_err(io_err)?;
        }

        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record([&self.latitude_column, &self.longitude_column])?;
        for point in registry.iter() {
            writer.write_record([point.lat.to_string(), point.lon.to_string()])?;
        }
        writer.flush().map_err(io_err)?;

        info!("Saved {} points to {}", registry.len(), self.path.display());
        Ok(())
    }
}

fn find_column(headers: &csv::StringRecord, preferred: &str, aliases: &[&str]) -> Option<usize> {
    let trimmed = || headers.iter().map(str::trim);
    trimmed()
        .position(|h| h == preferred)
        .or_else(|| trimmed().position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a))))
}

fn parse_field(record: &csv::StringRecord, idx: usize, line: u64) -> Result<f64> {
    let raw = record.get(idx).ok_or_else(|| Error::InvalidRecord {
        line,
        reason: format!("missing column {}", idx),
    })?;
    let value: f64 = raw.trim().parse().map_err(|_| Error::InvalidRecord {
        line,
        reason: format!("'{}' is not a number", raw),
    })?;
    if !value.is_finite() {
        return Err(Error::InvalidRecord {
            line,
            reason: format!("'{}' is not finite", raw),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PointStore::new(dir.path().join("none.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("points.csv");
        let store = PointStore::new(&path);

        let registry: PointRegistry = [
            GeoPoint::new(35.9749, 128.9461),
            GeoPoint::new(35.97612, 128.94002),
        ]
        .into_iter()
        .collect();
        store.save(&registry).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("\u{feff}위도,경도\n"));
        assert!(raw.contains("35.9749,128.9461\n"));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.points(), registry.points());
    }

    #[test]
    fn test_english_headers_without_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "Longitude,Latitude\n128.9,35.9\n128.8,35.8\n128.9,35.9\n").unwrap();

        let loaded = PointStore::new(&path).load().unwrap();
        assert_eq!(loaded.points(), &[GeoPoint::new(35.9, 128.9), GeoPoint::new(35.8, 128.8)]);
    }

    #[test]
    fn test_custom_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let store = PointStore::new(&path).with_columns("y", "x").with_bom(false);

        let registry: PointRegistry = std::iter::once(GeoPoint::new(1.5, 2.5)).collect();
        store.save(&registry).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "y,x\n1.5,2.5\n");
        assert_eq!(store.load().unwrap().points(), registry.points());
    }

    #[test]
    fn test_non_finite_point_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let store = PointStore::new(&path);

        let good: PointRegistry = std::iter::once(GeoPoint::new(35.9, 128.9)).collect();
        store.save(&good).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let mut bad = good.clone();
        assert!(bad.insert(GeoPoint::new(f64::NAN, 128.9)));
        match store.save(&bad) {
            Err(Error::InvalidRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.load().unwrap().points(), good.points());
    }

    #[test]
    fn test_unknown_columns_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(PointStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_bad_number_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "위도,경도\n35.9,128.9\nabc,128.9\n").unwrap();
        match PointStore::new(&path).load() {
            Err(Error::InvalidRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }
}
