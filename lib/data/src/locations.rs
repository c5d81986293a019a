//! Key-location configuration
//!
//! ```json
//! {
//!   "map_radius_m": 4500,
//!   "locations": {
//!     "hang_xanh": { "name": "Hang Xanh Intersection", "coords": [10.8011846, 106.7112997] }
//!   }
//! }
//! ```

use roadflow_core::{centroid, Coordinate, Error, KeyLocation, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Extraction radius around the centroid used when none is configured
pub const DEFAULT_MAP_RADIUS_M: f64 = 4500.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    /// `[latitude, longitude]`
    pub coords: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsConfig {
    #[serde(default = "default_map_radius")]
    pub map_radius_m: f64,
    pub locations: BTreeMap<String, LocationEntry>,
}

fn default_map_radius() -> f64 {
    DEFAULT_MAP_RADIUS_M
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            map_radius_m: DEFAULT_MAP_RADIUS_M,
            locations: BTreeMap::new(),
        }
    }
}

impl LocationsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range coordinates and a non-positive radius
    pub fn validate(&self) -> Result<()> {
        if !(self.map_radius_m > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "map_radius_m must be positive, got {}",
                self.map_radius_m
            )));
        }
        for (key, entry) in &self.locations {
            let (lat, lon) = entry.coords;
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(Error::InvalidConfig(format!(
                    "location {} has out-of-range coordinates ({}, {})",
                    key, lat, lon
                )));
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>, coords: (f64, f64)) {
        self.locations.insert(
            key.into(),
            LocationEntry {
                name: name.into(),
                coords,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<KeyLocation> {
        self.locations.get(key).map(|entry| to_key_location(key, entry))
    }

    /// Key locations in key order
    pub fn key_locations(&self) -> Vec<KeyLocation> {
        self.locations
            .iter()
            .map(|(key, entry)| to_key_location(key, entry))
            .collect()
    }

    /// Mean of all key-location coordinates: the centre of the extraction area
    pub fn centroid(&self) -> Option<Coordinate> {
        let points: Vec<Coordinate> = self
            .locations
            .values()
            .map(|entry| Coordinate::from(entry.coords))
            .collect();
        centroid(&points)
    }
}

fn to_key_location(key: &str, entry: &LocationEntry) -> KeyLocation {
    KeyLocation::new(key, entry.name.clone(), Coordinate::from(entry.coords))
}

pub fn load_locations<P: AsRef<Path>>(path: P) -> Result<LocationsConfig> {
    let json = std::fs::read_to_string(path)?;
    LocationsConfig::from_json(&json)
}
