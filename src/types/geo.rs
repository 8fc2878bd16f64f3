/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use dutch_weather::LatLon;
///
/// let de_bilt = LatLon(52.10, 5.18);
/// assert_eq!(de_bilt.0, 52.10); // Latitude
/// assert_eq!(de_bilt.1, 5.18); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A latitude/longitude bounding box, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Mainland Netherlands plus the coastal waters covered by the KNMI network.
    pub const NETHERLANDS: GeoBounds = GeoBounds {
        min_lat: 50.7,
        max_lat: 53.7,
        min_lon: 3.2,
        max_lon: 7.3,
    };

    pub fn contains(&self, location: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&location.0)
            && (self.min_lon..=self.max_lon).contains(&location.1)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::NETHERLANDS
    }
}
