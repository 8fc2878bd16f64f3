//! Combining per-station hourly series into one series at the target point.

use crate::stations::weighting::WeightedStation;
use crate::types::hour_range::HourRange;
use crate::types::series::HourlySeries;
use log::debug;

/// The spatially interpolated series together with the number of stations that
/// contributed to each hour.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialCombination {
    pub series: HourlySeries,
    pub contributors: Vec<usize>,
}

/// Weighted mean of the values that are present, with the weights of the present
/// values re-normalized to sum to one.
///
/// Returns the mean and the number of values used, or `None` if every value is
/// missing. A station that did not report therefore drops out for that hour
/// instead of pulling the estimate towards zero.
pub fn per_hour_renormalization(
    weights: &[f64],
    values: &[Option<f64>],
) -> Option<(f64, usize)> {
    let mut weight_sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut used = 0;
    for (weight, value) in weights.iter().zip(values) {
        if let Some(value) = value {
            weight_sum += weight;
            weighted_sum += weight * value;
            used += 1;
        }
    }
    if used == 0 || weight_sum <= 0.0 {
        return None;
    }
    Some((weighted_sum / weight_sum, used))
}

/// Combines the aligned series of the weighted stations hour by hour with
/// [`per_hour_renormalization`].
///
/// `per_station[i]` belongs to `weighted[i]`; all series cover `window`.
pub fn combine(
    window: &HourRange,
    weighted: &[WeightedStation],
    per_station: &[HourlySeries],
) -> SpatialCombination {
    let weights: Vec<f64> = weighted.iter().map(|ws| ws.weight).collect();
    let mut values = Vec::with_capacity(window.len());
    let mut contributors = Vec::with_capacity(window.len());
    let mut hour_values: Vec<Option<f64>> = Vec::with_capacity(per_station.len());

    for index in 0..window.len() {
        hour_values.clear();
        hour_values.extend(per_station.iter().map(|series| series.get(index)));

        match per_hour_renormalization(&weights, &hour_values) {
            Some((value, used)) => {
                values.push(Some(value));
                contributors.push(used);
            }
            None => {
                values.push(None);
                contributors.push(0);
            }
        }
    }

    let complete = contributors.iter().filter(|c| **c == weights.len()).count();
    debug!(
        "Combined {} stations over {} hours, {} hours with every station reporting",
        weights.len(),
        window.len(),
        complete
    );

    SpatialCombination {
        series: HourlySeries::new(window.start(), values),
        contributors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::Station;
    use chrono::{Duration, TimeZone, Utc};

    fn weighted(id: u32, weight: f64) -> WeightedStation {
        WeightedStation {
            station: Station::new(id, 52.0, 5.0),
            distance_km: 1.0,
            weight,
        }
    }

    #[test]
    fn test_equal_weights_average() {
        let h0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = HourRange::new(h0, h0 + Duration::hours(2));
        let stations = [weighted(1, 0.5), weighted(2, 0.5)];
        let series = [
            HourlySeries::new(h0, vec![Some(10.0), Some(11.0)]),
            HourlySeries::new(h0, vec![Some(12.0), Some(13.0)]),
        ];

        let combined = combine(&window, &stations, &series);
        assert_eq!(combined.series.values(), &[Some(11.0), Some(12.0)]);
        assert_eq!(combined.contributors, vec![2, 2]);
    }

    #[test]
    fn test_missing_station_is_renormalized_away() {
        let h0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = HourRange::new(h0, h0 + Duration::hours(2));
        let stations = [weighted(1, 0.5), weighted(2, 0.5)];
        let series = [
            HourlySeries::new(h0, vec![Some(10.0), None]),
            HourlySeries::new(h0, vec![None, None]),
        ];

        let combined = combine(&window, &stations, &series);
        assert_eq!(combined.series.get(0), Some(10.0));
        assert_eq!(combined.series.get(1), None);
        assert_eq!(combined.contributors, vec![1, 0]);
    }

    #[test]
    fn test_weighted_average_invariant() {
        let weights = [0.6, 0.3, 0.1];
        let values = [Some(4.0), Some(-2.0), Some(7.5)];
        let (mean, used) = per_hour_renormalization(&weights, &values).unwrap();
        let expected: f64 = weights.iter().zip(values).map(|(w, v)| w * v.unwrap()).sum();
        assert_eq!(used, 3);
        assert!((mean - expected).abs() < 1e-9);

        let partial = [Some(4.0), None, Some(7.5)];
        let (mean, used) = per_hour_renormalization(&weights, &partial).unwrap();
        assert_eq!(used, 2);
        assert!((mean - (0.6 * 4.0 + 0.1 * 7.5) / 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_no_stations() {
        let h0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = HourRange::new(h0, h0 + Duration::hours(3));
        let combined = combine(&window, &[], &[]);
        assert_eq!(combined.series.len(), 3);
        assert_eq!(combined.series.valid_count(), 0);
    }
}
