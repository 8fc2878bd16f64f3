//! The main entry point: interpolated weather at a point in the Netherlands.
//!
//! [`DutchWeather`] holds a station catalog, an observation store and an
//! [`InterpolationConfig`]. Queries select and weight the stations around the target,
//! combine their hourly readings and resample the result onto the requested interval.

use crate::config::InterpolationConfig;
use crate::error::DutchWeatherError;
use crate::interpolation::aligner::align;
use crate::interpolation::spatial::combine;
use crate::interpolation::temporal::{resample, sample_count};
use crate::observations::fetcher::KnmiFetcher;
use crate::observations::knmi::KnmiDataset;
use crate::observations::store::{InMemoryObservationStore, ObservationStore};
use crate::stations::catalog::StationCatalog;
use crate::stations::weighting::select_weights;
use crate::types::geo::LatLon;
use crate::types::hour_range::{ceil_hour, HourRange};
use crate::types::metric_spec::MetricSpec;
use crate::types::series::HourlySeries;
use crate::types::weather_table::{AbsentMetric, AbsentReason, MetricColumn, WeatherTable};
use bon::bon;
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::{debug, info, warn};

/// Sampling interval used when the caller does not pass one.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 15;

/// Interpolates KNMI station observations to arbitrary locations and time grids.
///
/// # Examples
///
/// ```rust
/// # use dutch_weather::{DutchWeather, InMemoryObservationStore, LatLon, MetricSpec, ParameterCode, RawValue, Station, StationCatalog};
/// # use dutch_weather::DutchWeatherError;
/// # use chrono::{Duration, TimeZone, Utc};
/// # fn main() -> Result<(), DutchWeatherError> {
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let catalog = StationCatalog::new(vec![Station::new(260, 52.10, 5.18)]);
/// let store = InMemoryObservationStore::new()
///     .with(260, start, ParameterCode::T, RawValue::Value(40))
///     .with(260, start + Duration::hours(1), ParameterCode::T, RawValue::Value(60));
///
/// let weather = DutchWeather::new(catalog, store);
/// let table = weather
///     .interpolated_weather()
///     .location(LatLon(52.09, 5.12))
///     .start(start)
///     .end(start + Duration::hours(1))
///     .interval_minutes(30)
///     .metrics(MetricSpec::new().metric("T", "temperature")?)
///     .call()?;
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.column("temperature"), Some(&[4.0, 5.0][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DutchWeather<S: ObservationStore = InMemoryObservationStore> {
    catalog: StationCatalog,
    store: S,
    config: InterpolationConfig,
}

impl DutchWeather<InMemoryObservationStore> {
    /// Uses the stations and observations of a parsed KNMI download.
    pub fn from_knmi(dataset: KnmiDataset, config: InterpolationConfig) -> Self {
        Self::with_config(dataset.catalog(), dataset.observations, config)
    }

    /// Downloads the KNMI hourly data needed to answer queries between `start` and
    /// `end` for `metrics`.
    ///
    /// # Errors
    ///
    /// Returns [`DutchWeatherError::InvalidWindow`] unless `start < end`, and
    /// [`DutchWeatherError::Observations`] if downloading or parsing fails.
    pub async fn fetch<Tz: TimeZone>(
        fetcher: &KnmiFetcher,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
        metrics: &MetricSpec,
        config: InterpolationConfig,
    ) -> Result<Self, DutchWeatherError> {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            return Err(DutchWeatherError::InvalidWindow { start, end });
        }
        let dataset = fetcher.fetch(start, end, metrics).await?;
        Ok(Self::from_knmi(dataset, config))
    }
}

#[bon]
impl<S: ObservationStore> DutchWeather<S> {
    /// Creates an engine with the default [`InterpolationConfig`].
    pub fn new(catalog: StationCatalog, store: S) -> Self {
        Self::with_config(catalog, store, InterpolationConfig::default())
    }

    pub fn with_config(catalog: StationCatalog, store: S, config: InterpolationConfig) -> Self {
        Self {
            catalog,
            store,
            config,
        }
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Interpolated weather at `location` for every `interval_minutes` from `start`
    /// up to (not including) `end`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The target point.
    /// * `.start(DateTime<Tz>)`: **Required.** First output timestamp. Its time zone is used for the result.
    /// * `.end(DateTime<Tz>)`: **Required.** Exclusive end of the window.
    /// * `.interval_minutes(u32)`: Optional. Spacing of the output rows. Defaults to `15`.
    /// * `.metrics(MetricSpec)`: Optional. Defaults to [`MetricSpec::default()`].
    ///
    /// # Returns
    ///
    /// A [`WeatherTable`] with `ceil((end - start) / interval)` rows. A metric whose
    /// missing hours cannot be bridged by the configured gap policy is listed in
    /// [`WeatherTable::absent`] instead of getting a column.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`DutchWeatherError::InvalidInterval`] for a zero interval.
    /// - [`DutchWeatherError::NoMetrics`] for an empty metric set.
    /// - [`DutchWeatherError::InvalidWindow`] unless `start < end`.
    /// - [`DutchWeatherError::OutOfBounds`] if `location` lies outside the configured bounds.
    /// - [`DutchWeatherError::InvalidPower`] if the configured power is negative or not finite.
    /// - [`DutchWeatherError::EmptyCatalog`] if there are no stations.
    /// - [`DutchWeatherError::Range`] if the store does not cover the window.
    /// - [`DutchWeatherError::InsufficientData`] if a metric has no valid reading at any
    ///   contributing station during `start..end`.
    ///
    /// The [`WeatherTable::to_dataframe`] view of the result holds UTC instants; the
    /// zone of `start` is only kept on [`WeatherTable::timestamps`].
    #[builder]
    pub fn interpolated_weather<Tz: TimeZone>(
        &self,
        location: LatLon,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        interval_minutes: Option<u32>,
        metrics: Option<MetricSpec>,
    ) -> Result<WeatherTable<Tz>, DutchWeatherError> {
        let interval_minutes = interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES);
        let metrics = metrics.unwrap_or_default();

        if interval_minutes == 0 {
            return Err(DutchWeatherError::InvalidInterval(interval_minutes));
        }
        if metrics.is_empty() {
            return Err(DutchWeatherError::NoMetrics);
        }
        let zone = start.timezone();
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            return Err(DutchWeatherError::InvalidWindow { start, end });
        }
        if !self.config.bounds.contains(location) {
            return Err(DutchWeatherError::OutOfBounds {
                lat: location.0,
                lon: location.1,
            });
        }

        let weighted = select_weights(
            location,
            &self.catalog,
            self.config.selection,
            self.config.power,
        )?;
        let window = self.hourly_window(start, end)?;
        let requested = HourRange::new(start, end);
        info!(
            "Interpolating {} metrics at ({}, {}) from {} stations, {} .. {}",
            metrics.len(),
            location.0,
            location.1,
            weighted.len(),
            start,
            end
        );

        let mut columns = Vec::with_capacity(metrics.len());
        let mut absent = Vec::new();
        for entry in metrics.entries() {
            let per_station: Vec<HourlySeries> = weighted
                .iter()
                .map(|ws| align(&ws.station, entry, &window, &self.store))
                .collect();
            let combined = combine(&window, &weighted, &per_station);
            debug!(
                "{}: stations contributing per hour {:?}",
                entry.output_name, combined.contributors
            );

            // Anchors past `end` only serve as interpolation partners
            let reported = combined
                .series
                .values()
                .iter()
                .take(requested.len())
                .flatten()
                .count();
            if reported == 0 {
                return Err(DutchWeatherError::InsufficientData {
                    metric: entry.output_name.clone(),
                });
            }

            match resample(
                &combined.series,
                start,
                end,
                interval_minutes,
                self.config.gap_policy,
            ) {
                Ok(series) => columns.push(MetricColumn {
                    name: entry.output_name.clone(),
                    values: series.into_values(),
                }),
                Err(DutchWeatherError::UnresolvedGap { timestamp }) => {
                    warn!(
                        "Dropping metric {}: no usable hourly value near {}",
                        entry.output_name, timestamp
                    );
                    absent.push(AbsentMetric {
                        name: entry.output_name.clone(),
                        reason: AbsentReason::UnresolvedGap { timestamp },
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let interval = Duration::minutes(i64::from(interval_minutes));
        let step_ms = interval.num_milliseconds();
        let timestamps = (0..sample_count(start, end, interval))
            .map(|k| {
                (start + Duration::milliseconds(step_ms * k as i64)).with_timezone(&zone)
            })
            .collect();

        Ok(WeatherTable::new(timestamps, columns, absent))
    }

    /// The hours to align: every hour from the one containing `start` up to and
    /// including the first hour at or after `end`, clipped to the store's coverage.
    fn hourly_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HourRange, DutchWeatherError> {
        let window = HourRange::new(start, ceil_hour(end) + Duration::hours(1));
        let Some(coverage) = self.store.coverage() else {
            return Ok(window);
        };

        let needed = HourRange::new(start, end);
        if !coverage.contains_range(&needed) {
            return Err(DutchWeatherError::Range {
                start,
                end,
                available_start: coverage.start(),
                available_end: coverage.end(),
            });
        }
        Ok(window.intersection(&coverage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::temporal::GapPolicy;
    use crate::stations::weighting::StationSelection;
    use crate::types::observation::RawValue;
    use crate::types::parameter::ParameterCode;
    use crate::types::station::Station;
    use chrono::FixedOffset;

    fn h(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn m(minutes: i64) -> DateTime<Utc> {
        h(0) + Duration::minutes(minutes)
    }

    fn catalog() -> StationCatalog {
        StationCatalog::new(vec![
            Station::new(1, 52.0, 5.0).with_name("A"),
            Station::new(2, 52.0, 5.1).with_name("B"),
        ])
    }

    /// Temperatures: A reads 10, 12, 14 and B reads 12, 12, 12 over three hours.
    fn store() -> InMemoryObservationStore {
        let mut store = InMemoryObservationStore::new();
        for (i, (a, b)) in [(100, 120), (120, 120), (140, 120)].into_iter().enumerate() {
            store.insert(1, h(i as i64), ParameterCode::T, RawValue::Value(a));
            store.insert(2, h(i as i64), ParameterCode::T, RawValue::Value(b));
        }
        store.set_coverage(HourRange::new(h(0), h(3)));
        store
    }

    fn temperature() -> MetricSpec {
        MetricSpec::new().metric("T", "temp").unwrap()
    }

    fn between() -> LatLon {
        LatLon(52.0, 5.05)
    }

    #[test]
    fn test_midpoint_between_two_stations() {
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(30)
            .metrics(temperature())
            .call()
            .unwrap();

        assert_eq!(table.timestamps(), &[m(0), m(30)]);
        let temp = table.column("temp").unwrap();
        assert!((temp[0] - 11.0).abs() < 1e-9);
        assert!((temp[1] - 11.5).abs() < 1e-9);
        assert!(table.absent().is_empty());
    }

    #[test]
    fn test_one_hour_window_gives_the_combined_value() {
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(1))
            .end(h(2))
            .interval_minutes(60)
            .metrics(temperature())
            .call()
            .unwrap();
        assert_eq!(table.len(), 1);
        assert!((table.value(0, "temp").unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_station_does_not_drag_value_down() {
        let mut store = store();
        store.insert(2, h(0), ParameterCode::T, RawValue::Missing);
        let weather = DutchWeather::new(catalog(), store);
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(60)
            .metrics(temperature())
            .call()
            .unwrap();
        assert!((table.value(0, "temp").unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_count_and_spacing() {
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(2))
            .interval_minutes(37)
            .metrics(temperature())
            .call()
            .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.column("temp").unwrap().len(), 4);
        for pair in table.timestamps().windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(37));
        }
    }

    #[test]
    fn test_default_interval_is_fifteen_minutes() {
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .metrics(temperature())
            .call()
            .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.timestamps()[1], m(15));
    }

    #[test]
    fn test_weighted_average_invariant() {
        let target = LatLon(52.02, 5.03);
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(target)
            .start(h(0))
            .end(h(1))
            .interval_minutes(60)
            .metrics(temperature())
            .call()
            .unwrap();

        let weights =
            select_weights(target, &catalog(), StationSelection::default(), 2.0).unwrap();
        let expected: f64 = weights
            .iter()
            .map(|ws| ws.weight * if ws.station.id == 1 { 10.0 } else { 12.0 })
            .sum();
        assert!((table.value(0, "temp").unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_station_reproduces_its_series() {
        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(LatLon(52.0, 5.0))
            .start(h(0))
            .end(h(3))
            .interval_minutes(60)
            .metrics(temperature())
            .call()
            .unwrap();
        let temp = table.column("temp").unwrap();
        assert_eq!(temp.len(), 3);
        for (value, expected) in temp.iter().zip([10.0, 12.0, 14.0]) {
            assert!((value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_result_is_in_the_zone_of_start() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = h(0).with_timezone(&zone);
        let end = h(1).with_timezone(&zone);

        let weather = DutchWeather::new(catalog(), store());
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(start)
            .end(end)
            .interval_minutes(30)
            .metrics(temperature())
            .call()
            .unwrap();

        assert_eq!(table.timestamps()[0].offset(), &zone);
        assert_eq!(table.timestamps()[0].with_timezone(&Utc), h(0));
        assert_eq!(table.timestamps()[1].with_timezone(&Utc), m(30));
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let weather = DutchWeather::new(catalog(), store());
        let query = || {
            weather
                .interpolated_weather()
                .location(LatLon(52.03, 5.07))
                .start(m(10))
                .end(m(130))
                .interval_minutes(20)
                .metrics(temperature())
                .call()
                .unwrap()
        };
        let first = query();
        let second = query();
        assert_eq!(first.timestamps(), second.timestamps());
        assert_eq!(first.columns(), second.columns());
    }

    #[test]
    fn test_validation_errors() {
        let weather = DutchWeather::new(catalog(), store());

        let zero_interval = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(0)
            .metrics(temperature())
            .call();
        assert!(matches!(
            zero_interval,
            Err(DutchWeatherError::InvalidInterval(0))
        ));

        let no_metrics = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .metrics(MetricSpec::new())
            .call();
        assert!(matches!(no_metrics, Err(DutchWeatherError::NoMetrics)));

        let reversed = weather
            .interpolated_weather()
            .location(between())
            .start(h(1))
            .end(h(0))
            .metrics(temperature())
            .call();
        assert!(matches!(
            reversed,
            Err(DutchWeatherError::InvalidWindow { .. })
        ));

        let paris = weather
            .interpolated_weather()
            .location(LatLon(48.85, 2.35))
            .start(h(0))
            .end(h(1))
            .metrics(temperature())
            .call();
        assert!(matches!(paris, Err(DutchWeatherError::OutOfBounds { .. })));
    }

    #[test]
    fn test_empty_catalog() {
        let weather = DutchWeather::new(StationCatalog::new(vec![]), store());
        let result = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .metrics(temperature())
            .call();
        assert!(matches!(result, Err(DutchWeatherError::EmptyCatalog)));
    }

    #[test]
    fn test_window_outside_coverage() {
        let weather = DutchWeather::new(catalog(), store());
        let result = weather
            .interpolated_weather()
            .location(between())
            .start(h(2))
            .end(h(5))
            .metrics(temperature())
            .call();
        match result {
            Err(DutchWeatherError::Range {
                available_start,
                available_end,
                ..
            }) => {
                assert_eq!(available_start, h(0));
                assert_eq!(available_end, h(3));
            }
            other => panic!("expected a range error, got {other:?}"),
        }
    }

    #[test]
    fn test_metric_without_data() {
        let weather = DutchWeather::new(catalog(), store());
        let metrics = temperature().metric("U", "humidity").unwrap();
        let result = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .metrics(metrics)
            .call();
        assert!(
            matches!(result, Err(DutchWeatherError::InsufficientData { metric }) if metric == "humidity")
        );
    }

    #[test]
    fn test_empty_radius_selection_is_insufficient_data() {
        let config = InterpolationConfig::builder()
            .selection(StationSelection::WithinRadius(1.0))
            .build();
        let weather = DutchWeather::with_config(catalog(), store(), config);
        let result = weather
            .interpolated_weather()
            .location(LatLon(52.5, 5.5))
            .start(h(0))
            .end(h(1))
            .metrics(temperature())
            .call();
        assert!(matches!(
            result,
            Err(DutchWeatherError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_unresolved_gap_leaves_metric_absent() {
        let mut store = store();
        // wind is only reported in the first hour
        store.insert(1, h(0), ParameterCode::FH, RawValue::Value(50));
        let config = InterpolationConfig::builder()
            .gap_policy(GapPolicy::Strict)
            .build();
        let weather = DutchWeather::with_config(catalog(), store, config);

        let metrics = temperature().metric("FH", "wind").unwrap();
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(30)
            .metrics(metrics)
            .call()
            .unwrap();

        assert_eq!(table.metric_names().collect::<Vec<_>>(), ["temp"]);
        assert_eq!(table.column("wind"), None);
        assert_eq!(
            table.absent(),
            &[AbsentMetric {
                name: "wind".to_string(),
                reason: AbsentReason::UnresolvedGap { timestamp: m(30) },
            }]
        );
    }

    #[test]
    fn test_store_without_coverage_is_not_range_checked() {
        let mut store = InMemoryObservationStore::new();
        store.insert(1, h(0), ParameterCode::T, RawValue::Value(100));
        store.insert(1, h(1), ParameterCode::T, RawValue::Value(100));
        let weather = DutchWeather::new(catalog(), store);
        let table = weather
            .interpolated_weather()
            .location(LatLon(52.0, 5.0))
            .start(h(0))
            .end(h(1))
            .interval_minutes(60)
            .metrics(temperature())
            .call()
            .unwrap();
        assert_eq!(table.value(0, "temp"), Some(10.0));
    }

    #[test]
    fn test_midpoint_towards_thirteen() {
        let mut store = store();
        store.insert(1, h(1), ParameterCode::T, RawValue::Value(130));
        store.insert(2, h(1), ParameterCode::T, RawValue::Value(130));
        let weather = DutchWeather::new(catalog(), store);
        let table = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(30)
            .metrics(temperature())
            .call()
            .unwrap();

        let temp = table.column("temp").unwrap();
        assert!((temp[0] - 11.0).abs() < 1e-9);
        assert!((temp[1] - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_reading_only_after_end_is_insufficient_data() {
        let mut store = InMemoryObservationStore::new();
        store.insert(1, h(1), ParameterCode::T, RawValue::Value(50));
        store.set_coverage(HourRange::new(h(0), h(3)));
        let weather = DutchWeather::new(catalog(), store);
        let result = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .interval_minutes(60)
            .metrics(temperature())
            .call();
        assert!(
            matches!(result, Err(DutchWeatherError::InsufficientData { metric }) if metric == "temp")
        );
    }

    #[test]
    fn test_non_finite_power_is_rejected() {
        let config = InterpolationConfig::builder().power(f64::NAN).build();
        let weather = DutchWeather::with_config(catalog(), store(), config);
        let result = weather
            .interpolated_weather()
            .location(between())
            .start(h(0))
            .end(h(1))
            .metrics(temperature())
            .call();
        assert!(matches!(result, Err(DutchWeatherError::InvalidPower(_))));
    }

    #[test]
    fn test_from_knmi_dataset() -> Result<(), Box<dyn std::error::Error>> {
        let text = "\
# STN         LON(east)   LAT(north)  ALT(m)      NAME
# 260:         5.180       52.100       1.90  De Bilt
# 344:         4.447       51.962      -4.30  Rotterdam
# STN,YYYYMMDD,   HH,    T,   FH
  260,20240101,    1,   40,   30
  260,20240101,    2,   60,   40
  344,20240101,    1,   80,   50
  344,20240101,    2,   80,   60
";
        let dataset = crate::observations::knmi::parse_hourly(text)?;
        let weather = DutchWeather::from_knmi(dataset, InterpolationConfig::default());
        let metrics = MetricSpec::new()
            .metric("T", "temp")?
            .metric("FH", "wind")?;

        let table = weather
            .interpolated_weather()
            .location(LatLon(52.05, 4.80))
            .start(h(0))
            .end(h(1))
            .interval_minutes(60)
            .metrics(metrics)
            .call()?;

        let temp = table.value(0, "temp").ok_or("no temperature")?;
        let wind = table.value(0, "wind").ok_or("no wind")?;
        assert!(temp > 4.0 && temp < 8.0);
        assert!(wind > 3.0 && wind < 5.0);

        let df = table.to_dataframe()?;
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 3);
        Ok(())
    }
}
