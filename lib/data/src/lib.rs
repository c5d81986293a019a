//! # roadflow Data
//!
//! Input formats consumed by roadflow: road network extracts delivered by
//! an external map-data fetcher, and the key-location configuration used to
//! pick flow endpoints.
//!
//! - [`NetworkExtract`] - Nodes and road segments, normalized into builder records
//! - [`LocationsConfig`] - Named key locations and the extraction radius

pub mod locations;
pub mod network;

pub use locations::{load_locations, LocationEntry, LocationsConfig, DEFAULT_MAP_RADIUS_M};
pub use network::{load_network, Direction, ExtractEdge, NetworkExtract, TagValue};
