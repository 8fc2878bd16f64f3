use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_HOUR: i64 = 3600;

/// Truncates a UTC instant to the start of its hour.
pub fn floor_hour(datetime: DateTime<Utc>) -> DateTime<Utc> {
    let into_hour = datetime.timestamp().rem_euclid(SECONDS_PER_HOUR);
    datetime
        - Duration::seconds(into_hour)
        - Duration::nanoseconds(i64::from(datetime.timestamp_subsec_nanos()))
}

/// Rounds a UTC instant up to the next hour boundary, leaving exact hours unchanged.
pub fn ceil_hour(datetime: DateTime<Utc>) -> DateTime<Utc> {
    let floored = floor_hour(datetime);
    if floored == datetime {
        floored
    } else {
        floored + Duration::hours(1)
    }
}

/// A half-open range of whole UTC hours, `[start, end)`.
///
/// Both bounds are hour-aligned; constructors align them, so a range always
/// contains a whole number of hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl HourRange {
    /// Creates the range of hours from `floor_hour(start)` up to `ceil_hour(end)`.
    /// An `end` before `start` yields an empty range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let start = floor_hour(start);
        let end = ceil_hour(end).max(start);
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Number of hours in the range.
    pub fn len(&self) -> usize {
        ((self.end - self.start).num_seconds() / SECONDS_PER_HOUR) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The hour at position `index`, counted from the start of the range.
    pub fn hour_at(&self, index: usize) -> DateTime<Utc> {
        self.start + Duration::hours(index as i64)
    }

    pub fn hours(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.len()).map(|i| self.hour_at(i))
    }

    pub fn contains_range(&self, other: &HourRange) -> bool {
        other.is_empty() || (self.start <= other.start && other.end <= self.end)
    }

    /// The smallest range covering both `self` and `other`.
    pub fn union(&self, other: &HourRange) -> HourRange {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        HourRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The overlap of `self` and `other`, empty when they are disjoint.
    pub fn intersection(&self, other: &HourRange) -> HourRange {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end).max(start);
        HourRange { start, end }
    }
}
