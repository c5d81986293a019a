//! Road capacity model
//!
//! Maps an OSM `highway` classification and a lane count to a throughput
//! estimate in vehicles per hour. Capacities are always strictly positive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Road classification, following OSM `highway` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    TertiaryLink,
    Residential,
    Unclassified,
    Service,
    LivingStreet,
    /// Any classification not listed above
    Other,
}

/// Base capacity for classifications the model does not recognize.
/// Equal to the smallest entry of the table.
pub const FALLBACK_LANE_CAPACITY: f64 = 400.0;

impl RoadClass {
    pub const ALL: [RoadClass; 15] = [
        RoadClass::Motorway,
        RoadClass::Trunk,
        RoadClass::Primary,
        RoadClass::Secondary,
        RoadClass::Tertiary,
        RoadClass::MotorwayLink,
        RoadClass::TrunkLink,
        RoadClass::PrimaryLink,
        RoadClass::SecondaryLink,
        RoadClass::TertiaryLink,
        RoadClass::Residential,
        RoadClass::Unclassified,
        RoadClass::Service,
        RoadClass::LivingStreet,
        RoadClass::Other,
    ];

    /// Parse an OSM `highway` tag. Never fails: unrecognized values map to
    /// [`RoadClass::Other`]. List values (`"primary;secondary"`) use the first entry.
    pub fn parse(highway: &str) -> Self {
        let first = highway.split(';').next().unwrap_or("").trim();
        match first.to_ascii_lowercase().as_str() {
            "motorway" => RoadClass::Motorway,
            "trunk" => RoadClass::Trunk,
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "motorway_link" => RoadClass::MotorwayLink,
            "trunk_link" => RoadClass::TrunkLink,
            "primary_link" => RoadClass::PrimaryLink,
            "secondary_link" => RoadClass::SecondaryLink,
            "tertiary_link" => RoadClass::TertiaryLink,
            "residential" => RoadClass::Residential,
            "unclassified" => RoadClass::Unclassified,
            "service" => RoadClass::Service,
            "living_street" => RoadClass::LivingStreet,
            _ => RoadClass::Other,
        }
    }

    /// Per-lane capacity in vehicles per hour
    #[inline]
    pub fn lane_capacity(self) -> f64 {
        match self {
            RoadClass::Motorway => 2000.0,
            RoadClass::Trunk => 1800.0,
            RoadClass::Primary => 1600.0,
            RoadClass::Secondary => 1400.0,
            RoadClass::Tertiary => 1200.0,
            RoadClass::MotorwayLink => 1500.0,
            RoadClass::TrunkLink => 1300.0,
            RoadClass::PrimaryLink => 1200.0,
            RoadClass::SecondaryLink => 1000.0,
            RoadClass::TertiaryLink => 900.0,
            RoadClass::Residential => 800.0,
            RoadClass::Unclassified => 600.0,
            RoadClass::Service => 500.0,
            RoadClass::LivingStreet => 400.0,
            RoadClass::Other => FALLBACK_LANE_CAPACITY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::Trunk => "trunk",
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary => "tertiary",
            RoadClass::MotorwayLink => "motorway_link",
            RoadClass::TrunkLink => "trunk_link",
            RoadClass::PrimaryLink => "primary_link",
            RoadClass::SecondaryLink => "secondary_link",
            RoadClass::TertiaryLink => "tertiary_link",
            RoadClass::Residential => "residential",
            RoadClass::Unclassified => "unclassified",
            RoadClass::Service => "service",
            RoadClass::LivingStreet => "living_street",
            RoadClass::Other => "other",
        }
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoadClass {
    fn from(highway: &str) -> Self {
        RoadClass::parse(highway)
    }
}

/// Edge capacity for a road of the given class and lane count.
/// A lane count of zero is treated as a single lane.
#[inline]
pub fn capacity(road_class: RoadClass, lanes: u32) -> f64 {
    road_class.lane_capacity() * f64::from(lanes.max(1))
}
