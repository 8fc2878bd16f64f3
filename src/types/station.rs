//! Defines the data structures representing KNMI weather stations and their location.
//! Also includes implementations necessary for spatial indexing using the `rstar` crate.

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Represents a single KNMI ground station.
///
/// Stations are owned by a [`crate::StationCatalog`] and never mutated by the
/// interpolation engine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The KNMI station number (e.g. `260` for De Bilt).
    pub id: u32,
    /// Human readable station name, if known.
    #[serde(default)]
    pub name: Option<String>,
    /// Geographical location details (latitude, longitude, elevation).
    pub location: Location,
}

impl Station {
    pub fn new(id: u32, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: None,
            location: Location {
                latitude,
                longitude,
                elevation: None,
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.location.elevation = Some(elevation);
        self
    }
}

/// Represents the geographical location of a weather station.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees north.
    pub latitude: f64,
    /// Longitude in decimal degrees east.
    pub longitude: f64,
    /// Elevation above mean sea level in meters, if available. Can be negative in the Netherlands.
    #[serde(default)]
    pub elevation: Option<f64>,
}

// --- R-Tree Implementations ---

/// A station is a degenerate envelope in (latitude, longitude) space.
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

/// Squared planar distance in degrees. Only used to order R-tree candidates; the
/// catalog re-ranks them with the great-circle distance.
impl PointDistance for Station {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}
