//! The result of an interpolation query.

use chrono::{DateTime, TimeZone, Utc};
use polars::prelude::{
    Column, DataFrame, DataType, NamedFrom, PolarsResult, Series, TimeUnit,
};
use std::fmt;

/// Why a requested metric has no column in a [`WeatherTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum AbsentReason {
    /// Missing hourly anchors around `timestamp` could not be bridged by the gap policy.
    UnresolvedGap { timestamp: DateTime<Utc> },
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsentReason::UnresolvedGap { timestamp } => {
                write!(f, "no valid hourly anchor near {timestamp}")
            }
        }
    }
}

/// A metric that was requested but could not be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsentMetric {
    pub name: String,
    pub reason: AbsentReason,
}

/// One delivered metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Interpolated weather at one location, keyed by timestamp and metric name.
///
/// Timestamps are expressed in the time zone the query's `start` carried. Every
/// column has exactly one value per timestamp; metrics that could not be resolved
/// are listed in [`WeatherTable::absent`] instead of being zero-filled.
#[derive(Debug, Clone)]
pub struct WeatherTable<Tz: TimeZone> {
    timestamps: Vec<DateTime<Tz>>,
    columns: Vec<MetricColumn>,
    absent: Vec<AbsentMetric>,
}

impl<Tz: TimeZone> WeatherTable<Tz> {
    pub(crate) fn new(
        timestamps: Vec<DateTime<Tz>>,
        columns: Vec<MetricColumn>,
        absent: Vec<AbsentMetric>,
    ) -> Self {
        Self {
            timestamps,
            columns,
            absent,
        }
    }

    pub fn timestamps(&self) -> &[DateTime<Tz>] {
        &self.timestamps
    }

    /// Number of rows (timestamps).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    pub fn absent(&self) -> &[AbsentMetric] {
        &self.absent
    }

    /// Names of the delivered metrics, in request order.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// The value of `metric` in row `row`.
    pub fn value(&self, row: usize, metric: &str) -> Option<f64> {
        self.column(metric)?.get(row).copied()
    }

    /// Converts the table into a Polars `DataFrame` with a `timestamp` column
    /// (millisecond precision, UTC, timezone-naive) followed by one `f64` column
    /// per delivered metric.
    ///
    /// The frame does not carry the table's time zone: timestamps are the UTC
    /// instants of [`WeatherTable::timestamps`].
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let millis: Vec<i64> = self
            .timestamps
            .iter()
            .map(|t| t.timestamp_millis())
            .collect();
        let timestamp = Series::new("timestamp".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::from(timestamp));
        for metric in &self.columns {
            columns.push(Column::from(Series::new(
                metric.name.as_str().into(),
                metric.values.as_slice(),
            )));
        }
        DataFrame::new(columns)
    }
}
