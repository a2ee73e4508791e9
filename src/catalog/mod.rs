use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::params::utc_timestamp;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Satellite asset record as the owning store keeps it.
#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteRecord {
    pub id: i64,
    pub satellite_name: String,
    pub tle_line1: String,
    pub tle_line2: String,
}

/// Ground station asset record as the owning store keeps it.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundStationRecord {
    pub id: i64,
    pub ground_station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub send_mask: i64,
    pub uplink_rate: i64,
    pub downlink_rate: i64,
}

/// Image request record as the owning store keeps it. `priority` is the raw
/// integer and is only converted when a snapshot is built.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequestRecord {
    pub id: i64,
    pub image_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: u8,
    #[serde(with = "utc_timestamp")]
    pub image_start_time: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    pub image_end_time: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    pub delivery_time: DateTime<Utc>,
}

/// Lookup interface over the asset-management entities owned by the
/// relational store. The snapshot builder only ever reads by id.
pub trait AssetCatalog: Send + Sync {
    fn satellite(&self, id: i64) -> Option<SatelliteRecord>;
    fn ground_station(&self, id: i64) -> Option<GroundStationRecord>;
    fn image_request(&self, id: i64) -> Option<ImageRequestRecord>;
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    satellites: Vec<SatelliteRecord>,
    #[serde(default)]
    ground_stations: Vec<GroundStationRecord>,
    #[serde(default)]
    image_requests: Vec<ImageRequestRecord>,
}

/// Catalog loaded once from a YAML file at startup.
pub struct YamlCatalog {
    satellites: HashMap<i64, SatelliteRecord>,
    ground_stations: HashMap<i64, GroundStationRecord>,
    image_requests: HashMap<i64, ImageRequestRecord>,
}

impl YamlCatalog {
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Ok(YamlCatalog {
            satellites: file.satellites.into_iter().map(|s| (s.id, s)).collect(),
            ground_stations: file
                .ground_stations
                .into_iter()
                .map(|g| (g.id, g))
                .collect(),
            image_requests: file
                .image_requests
                .into_iter()
                .map(|r| (r.id, r))
                .collect(),
        })
    }
}

impl AssetCatalog for YamlCatalog {
    fn satellite(&self, id: i64) -> Option<SatelliteRecord> {
        self.satellites.get(&id).cloned()
    }

    fn ground_station(&self, id: i64) -> Option<GroundStationRecord> {
        self.ground_stations.get(&id).cloned()
    }

    fn image_request(&self, id: i64) -> Option<ImageRequestRecord> {
        self.image_requests.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
satellites:
  - id: 5
    satellite_name: SAT-1
    tle_line1: "1 25544U 98067A"
    tle_line2: "2 25544  51.6400"
ground_stations:
  - id: 9
    ground_station_name: Inuvik
    latitude: 68.3
    longitude: -133.5
    elevation: 102.5
    send_mask: 5
    uplink_rate: 40
    downlink_rate: 100
image_requests:
  - id: 42
    image_name: img-42
    latitude: 45.4
    longitude: -75.7
    priority: 3
    image_start_time: "2025-06-01T10:00:00"
    image_end_time: "2025-06-01T11:00:00"
    delivery_time: "2025-06-02T00:00:00"
"#;

    #[test]
    fn loads_and_looks_up_by_id() {
        let catalog = YamlCatalog::from_str(CATALOG).unwrap();
        assert_eq!(catalog.satellite(5).unwrap().satellite_name, "SAT-1");
        assert_eq!(catalog.ground_station(9).unwrap().downlink_rate, 100);
        assert_eq!(catalog.image_request(42).unwrap().priority, 3);
        assert!(catalog.satellite(6).is_none());
    }
}
