//! Inverse-distance weighting of the stations around a target point.

use crate::error::DutchWeatherError;
use crate::stations::catalog::StationCatalog;
use crate::types::geo::LatLon;
use crate::types::station::Station;
use log::debug;

/// Which stations contribute to the estimate at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StationSelection {
    /// The `k` nearest stations by great-circle distance.
    Nearest(usize),
    /// Every station within the given radius in kilometers.
    WithinRadius(f64),
}

impl StationSelection {
    pub const DEFAULT_NEAREST: usize = 5;
}

/// Defaults to the five nearest stations.
impl Default for StationSelection {
    fn default() -> Self {
        StationSelection::Nearest(Self::DEFAULT_NEAREST)
    }
}

/// A contributing station and its normalized weight for one target point.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedStation {
    pub station: Station,
    pub distance_km: f64,
    pub weight: f64,
}

/// Normalized inverse-distance weights `d_i^-p / Σ d_j^-p`.
///
/// Distances of exactly zero take all the weight, shared equally between them.
/// An empty input gives an empty output.
pub fn inverse_distance_weights(distances: &[f64], power: f64) -> Vec<f64> {
    let coincident = distances.iter().filter(|d| **d == 0.0).count();
    if coincident > 0 {
        let share = 1.0 / coincident as f64;
        return distances
            .iter()
            .map(|d| if *d == 0.0 { share } else { 0.0 })
            .collect();
    }

    let raw: Vec<f64> = distances.iter().map(|d| d.powf(-power)).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Selects the contributing stations for `target` and assigns them weights.
///
/// Stations are returned nearest first; equidistant stations are ordered by id.
/// When the target coincides with one or more stations, only those are returned.
///
/// # Errors
///
/// Returns [`DutchWeatherError::InvalidPower`] for a negative or non-finite power and
/// [`DutchWeatherError::EmptyCatalog`] if the catalog holds no stations.
pub fn select_weights(
    target: LatLon,
    catalog: &StationCatalog,
    selection: StationSelection,
    power: f64,
) -> Result<Vec<WeightedStation>, DutchWeatherError> {
    if !power.is_finite() || power < 0.0 {
        return Err(DutchWeatherError::InvalidPower(power));
    }
    if catalog.is_empty() {
        return Err(DutchWeatherError::EmptyCatalog);
    }

    let candidates = match selection {
        StationSelection::Nearest(k) => catalog.nearest(target, k),
        StationSelection::WithinRadius(km) => catalog.within_radius(target, km),
    };

    let distances: Vec<f64> = candidates.iter().map(|(_, d)| *d).collect();
    let weights = inverse_distance_weights(&distances, power);

    let weighted: Vec<WeightedStation> = candidates
        .into_iter()
        .zip(weights)
        .filter(|(_, weight)| *weight > 0.0)
        .map(|((station, distance_km), weight)| WeightedStation {
            station: station.clone(),
            distance_km,
            weight,
        })
        .collect();

    for ws in &weighted {
        debug!(
            "Station {} at {:.2} km weighs {:.4}",
            ws.station.id, ws.distance_km, ws.weight
        );
    }
    Ok(weighted)
}
