use crate::observations::error::ObservationError;
use crate::stations::error::CatalogError;
use chrono::{DateTime, Utc};
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DutchWeatherError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Observations(#[from] ObservationError),

    #[error("Unknown parameter code '{0}'")]
    UnknownParameter(String),

    #[error("The station catalog is empty")]
    EmptyCatalog,

    #[error("Location ({lat}, {lon}) lies outside the supported region")]
    OutOfBounds { lat: f64, lon: f64 },

    #[error("Requested window {start} .. {end} extends beyond the available hourly anchors {available_start} .. {available_end}")]
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        available_start: DateTime<Utc>,
        available_end: DateTime<Utc>,
    },

    #[error("No contributing station has a valid reading for metric '{metric}' in the requested window")]
    InsufficientData { metric: String },

    #[error("No valid hourly anchor close enough to resolve the value at {timestamp}")]
    UnresolvedGap { timestamp: DateTime<Utc> },

    #[error("Invalid time window: start ({start}) must be before end ({end})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid interval of {0} minutes, must be a positive number of minutes")]
    InvalidInterval(u32),

    #[error("Invalid inverse-distance power {0}, must be finite and not negative")]
    InvalidPower(f64),

    #[error("No metrics were requested")]
    NoMetrics,

    #[error("Output name '{0}' is used by more than one metric")]
    DuplicateMetric(String),

    #[error("Failed building DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
