use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crosswalk::grid::DEFAULT_MAX_CELLS;
use crosswalk::registry::PointStore;
use crosswalk::session::DEFAULT_CENTER;
use crosswalk::GeoPoint;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub boundary: BoundaryConfig,
    pub grid: GridConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    pub path: PathBuf,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/GEOJSON/yeongcheon_boundary_wgs84.geojson"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GridConfig {
    /// Cell side in degrees
    pub size: f64,
    pub max_cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        // Roughly 500 m at this latitude
        Self {
            size: 0.005,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub latitude_column: String,
    pub longitude_column: String,
    pub bom: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/횡단보도_좌표.csv"),
            latitude_column: "위도".to_string(),
            longitude_column: "경도".to_string(),
            bom: true,
        }
    }
}

impl StoreConfig {
    pub fn point_store(&self) -> PointStore {
        PointStore::new(&self.path)
            .with_columns(&self.latitude_column, &self.longitude_column)
            .with_bom(self.bom)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial map center as [lat, lon]
    pub center: [f64; 2],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            center: [DEFAULT_CENTER.lat, DEFAULT_CENTER.lon],
        }
    }
}

impl SessionConfig {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center[0], self.center[1])
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
