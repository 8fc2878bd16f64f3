use crate::stations::error::CatalogError;
use crate::types::geo::LatLon;
use crate::types::station::Station;
use haversine::{distance, Location as HaversineLocation, Units};
use log::info;
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::io::Read;
use std::path::Path;

/// The read-only set of stations available for interpolation, indexed by an R-tree.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    rtree: RTree<Station>,
}

/// Great-circle distance in kilometers.
pub fn distance_km(from: LatLon, station: &Station) -> f64 {
    distance(
        HaversineLocation {
            latitude: from.0,
            longitude: from.1,
        },
        HaversineLocation {
            latitude: station.location.latitude,
            longitude: station.location.longitude,
        },
        Units::Kilometers,
    )
}

/// Sorts by distance, then by station id so equidistant stations keep a fixed order.
fn sort_by_distance(stations: &mut [(&Station, f64)]) {
    stations.sort_by_key(|(station, dist)| (OrderedFloat(*dist), station.id));
}

impl StationCatalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            rtree: RTree::bulk_load(stations),
        }
    }

    /// Reads a JSON array of stations.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let stations: Vec<Station> = serde_json::from_reader(reader)?;
        Ok(Self::new(stations))
    }

    /// Reads a JSON array of stations from a file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let bytes =
            std::fs::read(path).map_err(|e| CatalogError::Read(path.to_path_buf(), e))?;
        let stations: Vec<Station> = serde_json::from_slice(&bytes)?;
        info!(
            "Loaded {} stations from {}",
            stations.len(),
            path.display()
        );
        Ok(Self::new(stations))
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.rtree.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Station> {
        self.rtree.iter().find(|s| s.id == id)
    }

    /// The `n_results` stations closest to `location`, nearest first, with their
    /// great-circle distance in kilometers.
    pub fn nearest(&self, location: LatLon, n_results: usize) -> Vec<(&Station, f64)> {
        if n_results == 0 {
            return vec![];
        }
        // The R-tree ranks by planar degrees, which disagrees with the great-circle
        // order at the margin. Take extra candidates and re-rank them.
        let candidate_limit = (n_results * 2).max(20);

        let mut stations_with_dist: Vec<(&Station, f64)> = self
            .rtree
            .nearest_neighbor_iter(&[location.0, location.1])
            .take(candidate_limit)
            .map(|station| (station, distance_km(location, station)))
            .collect();

        sort_by_distance(&mut stations_with_dist);
        stations_with_dist.truncate(n_results);
        stations_with_dist
    }

    /// All stations within `max_distance_km` of `location`, nearest first.
    pub fn within_radius(&self, location: LatLon, max_distance_km: f64) -> Vec<(&Station, f64)> {
        let mut stations_with_dist: Vec<(&Station, f64)> = self
            .rtree
            .iter()
            .map(|station| (station, distance_km(location, station)))
            .filter(|(_, dist)| *dist <= max_distance_km)
            .collect();

        sort_by_distance(&mut stations_with_dist);
        stations_with_dist
    }
}
