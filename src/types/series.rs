//! Time series produced by the interpolation pipeline.

use chrono::{DateTime, Duration, Utc};

/// One value slot per hour, `None` marking a missing value.
///
/// The index never has gaps: slot `i` always belongs to `start + i hours`, whether
/// or not it holds a value. This lets series of different stations be combined
/// positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    start: DateTime<Utc>,
    values: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn new(start: DateTime<Utc>, values: Vec<Option<f64>>) -> Self {
        Self { start, values }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// First hour after the last slot.
    pub fn end(&self) -> DateTime<Utc> {
        self.hour_at(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// The value in slot `index`; `None` if the slot is missing or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn hour_at(&self, index: usize) -> DateTime<Utc> {
        self.start + Duration::hours(index as i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<f64>)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (self.hour_at(i), *value))
    }

    /// Number of slots holding a value.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// A regularly sampled series without missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedSeries {
    start: DateTime<Utc>,
    interval: Duration,
    values: Vec<f64>,
}

impl InterpolatedSeries {
    pub fn new(start: DateTime<Utc>, interval: Duration, values: Vec<f64>) -> Self {
        Self {
            start,
            interval,
            values,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn timestamp_at(&self, index: usize) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.interval.num_milliseconds() * index as i64)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.values.len()).map(|i| self.timestamp_at(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps().zip(self.values.iter().copied())
    }
}
