mod config;
mod dutch_weather;
mod error;
mod interpolation;
mod observations;
mod stations;
mod types;
mod units;

pub use config::InterpolationConfig;
pub use dutch_weather::*;
pub use error::DutchWeatherError;

pub use interpolation::aligner::align;
pub use interpolation::spatial::{combine, per_hour_renormalization, SpatialCombination};
pub use interpolation::temporal::{resample, sample_count, GapPolicy};

pub use observations::fetcher::{KnmiFetcher, CHUNK_DAYS, KNMI_HOURLY_URL};
pub use observations::knmi::{parse_hourly, KnmiDataset};
pub use observations::store::{InMemoryObservationStore, ObservationStore};

pub use stations::catalog::{distance_km, StationCatalog};
pub use stations::weighting::{
    inverse_distance_weights, select_weights, StationSelection, WeightedStation,
};

pub use types::geo::{GeoBounds, LatLon};
pub use types::hour_range::{ceil_hour, floor_hour, HourRange};
pub use types::metric_spec::{MetricEntry, MetricSpec};
pub use types::observation::{ObservationRecord, RawValue};
pub use types::parameter::ParameterCode;
pub use types::series::{HourlySeries, InterpolatedSeries};
pub use types::station::{Location, Station};
pub use types::weather_table::{AbsentMetric, AbsentReason, MetricColumn, WeatherTable};

pub use units::conversion::Conversion;
pub use units::converter::{convert, parameter_table, parameter_unit, ParameterUnit};

pub use observations::error::ObservationError;
pub use stations::error::CatalogError;
