use crate::types::hour_range::{floor_hour, HourRange};
use crate::types::observation::{ObservationRecord, RawValue};
use crate::types::parameter::ParameterCode;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Read access to raw hourly observations.
///
/// Retrieval, parsing and any caching happen behind this trait; the interpolation
/// engine only asks for the record of one station in one hour.
pub trait ObservationStore {
    /// Everything `station_id` reported for the hour starting at `hour` (UTC,
    /// hour-aligned). `None` when the station reported nothing at all.
    fn observation(&self, station_id: u32, hour: DateTime<Utc>) -> Option<&ObservationRecord>;

    /// The hours this store holds data for, if known. Queries reaching outside
    /// are rejected instead of being answered with missing values.
    fn coverage(&self) -> Option<HourRange> {
        None
    }
}

/// An [`ObservationStore`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObservationStore {
    records: HashMap<(u32, DateTime<Utc>), ObservationRecord>,
    coverage: Option<HourRange>,
}

impl InMemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one raw reading. `hour` is truncated to the start of its hour.
    pub fn insert(
        &mut self,
        station_id: u32,
        hour: DateTime<Utc>,
        code: ParameterCode,
        value: RawValue,
    ) {
        self.records
            .entry((station_id, floor_hour(hour)))
            .or_default()
            .insert(code, value);
    }

    /// Builder-style variant of [`InMemoryObservationStore::insert`].
    pub fn with(
        mut self,
        station_id: u32,
        hour: DateTime<Utc>,
        code: ParameterCode,
        value: RawValue,
    ) -> Self {
        self.insert(station_id, hour, code, value);
        self
    }

    /// Declares the hours this store covers.
    pub fn set_coverage(&mut self, coverage: HourRange) {
        self.coverage = Some(coverage);
    }

    pub fn with_coverage(mut self, coverage: HourRange) -> Self {
        self.set_coverage(coverage);
        self
    }

    /// Number of (station, hour) records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Moves all records of `other` into `self`. Readings in `other` win on conflict.
    /// Coverage becomes the union of both.
    pub fn merge(&mut self, other: InMemoryObservationStore) {
        for (key, record) in other.records {
            self.records.entry(key).or_default().extend(record);
        }
        self.coverage = match (self.coverage, other.coverage) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
    }
}

impl ObservationStore for InMemoryObservationStore {
    fn observation(&self, station_id: u32, hour: DateTime<Utc>) -> Option<&ObservationRecord> {
        self.records.get(&(station_id, hour))
    }

    fn coverage(&self) -> Option<HourRange> {
        self.coverage
    }
}
