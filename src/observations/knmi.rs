//! Parser for the KNMI "uurgegevens" hourly text product.
//!
//! The product is a comment block listing the stations (`# 260: 5.180 52.100 1.90 De Bilt`),
//! a header line `# STN,YYYYMMDD,   HH,    T,...` and comma separated, space padded data
//! rows. A blank field is a missing reading. `HH` runs from 1 to 24 and labels the hour
//! *ending* at that time, so row `HH` is stored under `date + (HH - 1) hours` UTC.

use crate::observations::error::ObservationError;
use crate::observations::store::InMemoryObservationStore;
use crate::stations::catalog::StationCatalog;
use crate::types::hour_range::HourRange;
use crate::types::observation::RawValue;
use crate::types::parameter::ParameterCode;
use crate::types::station::Station;
use crate::units::converter::parameter_unit;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, info, warn};

/// Stations and observations read from one KNMI hourly download.
#[derive(Debug, Clone, Default)]
pub struct KnmiDataset {
    pub stations: Vec<Station>,
    pub observations: InMemoryObservationStore,
}

impl KnmiDataset {
    /// A catalog of the stations listed in the header block.
    pub fn catalog(&self) -> StationCatalog {
        StationCatalog::new(self.stations.clone())
    }

    /// Appends another dataset, typically the next download chunk. Stations are
    /// deduplicated by id, the first occurrence wins.
    pub fn merge(&mut self, other: KnmiDataset) {
        for station in other.stations {
            if !self.stations.iter().any(|s| s.id == station.id) {
                self.stations.push(station);
            }
        }
        self.observations.merge(other.observations);
    }
}

/// Column layout announced by the `# STN,YYYYMMDD,HH,...` line.
struct Header {
    station: usize,
    date: usize,
    hour: usize,
    parameters: Vec<(usize, ParameterCode)>,
}

impl Header {
    fn parse(line: &str, line_no: usize) -> Result<Self, ObservationError> {
        let names: Vec<&str> = line
            .trim_start_matches('#')
            .split(',')
            .map(str::trim)
            .collect();
        let position = |name: &str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or_else(|| ObservationError::Parse {
                    line: line_no,
                    message: format!("header lacks a {name} column"),
                })
        };

        let station = position("STN")?;
        let date = position("YYYYMMDD")?;
        let hour = position("HH")?;

        let mut parameters = Vec::new();
        for (index, name) in names.iter().enumerate() {
            if index == station || index == date || index == hour || name.is_empty() {
                continue;
            }
            match name.parse::<ParameterCode>() {
                Ok(code) => parameters.push((index, code)),
                Err(_) => debug!("Skipping unregistered KNMI column '{}'", name),
            }
        }

        Ok(Self {
            station,
            date,
            hour,
            parameters,
        })
    }
}

/// Reads a station line such as `# 260:   5.180   52.100   1.90  De Bilt`.
/// Returns `None` for any other comment line.
fn parse_station_line(line: &str) -> Option<Station> {
    let mut tokens = line.trim_start_matches('#').split_whitespace();
    let id: u32 = tokens.next()?.trim_end_matches(':').parse().ok()?;
    let longitude: f64 = tokens.next()?.parse().ok()?;
    let latitude: f64 = tokens.next()?.parse().ok()?;

    let mut station = Station::new(id, latitude, longitude);
    let rest: Vec<&str> = tokens.collect();
    let name_tokens: &[&str] = match rest.split_first() {
        Some((alt, name)) => match alt.parse::<f64>() {
            Ok(elevation) => {
                station = station.with_elevation(elevation);
                name
            }
            Err(_) => rest.as_slice(),
        },
        None => &[],
    };
    if !name_tokens.is_empty() {
        station = station.with_name(name_tokens.join(" "));
    }
    Some(station)
}

fn parse_timestamp(
    date: &str,
    hour: &str,
    line_no: usize,
) -> Result<DateTime<Utc>, ObservationError> {
    let date = NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|e| ObservationError::Parse {
        line: line_no,
        message: format!("invalid date '{date}': {e}"),
    })?;
    let hour: i64 = match hour.parse() {
        Ok(h @ 1..=24) => h,
        _ => {
            return Err(ObservationError::Parse {
                line: line_no,
                message: format!("hour '{hour}' is not in 1..=24"),
            })
        }
    };
    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();
    Ok(midnight + Duration::hours(hour - 1))
}

/// Parses the text of a KNMI hourly download.
///
/// Readings outside a parameter's plausible range are kept as
/// [`RawValue::Flagged`]. Columns for parameters that are not registered are
/// skipped. Text without a data header yields an empty dataset; the provider
/// returns that when the requested period has no data yet.
///
/// The store's coverage is set to the hours spanned by the data rows.
pub fn parse_hourly(text: &str) -> Result<KnmiDataset, ObservationError> {
    let mut dataset = KnmiDataset::default();
    let mut header: Option<Header> = None;
    let mut first_hour: Option<DateTime<Utc>> = None;
    let mut last_hour: Option<DateTime<Utc>> = None;
    let mut rows = 0usize;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') {
            let body = trimmed.trim_start_matches('#').trim_start();
            if body.starts_with("STN,") {
                header = Some(Header::parse(trimmed, line_no)?);
            } else if header.is_none() {
                if let Some(station) = parse_station_line(trimmed) {
                    dataset.stations.push(station);
                }
            }
            continue;
        }

        let Some(header) = header.as_ref() else {
            continue;
        };

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let field = |i: usize| {
            fields.get(i).copied().ok_or_else(|| ObservationError::Parse {
                line: line_no,
                message: format!("expected at least {} fields, found {}", i + 1, fields.len()),
            })
        };

        let station_id: u32 = field(header.station)?
            .parse()
            .map_err(|e| ObservationError::Parse {
                line: line_no,
                message: format!("invalid station id: {e}"),
            })?;
        let hour = parse_timestamp(field(header.date)?, field(header.hour)?, line_no)?;

        for &(column, code) in &header.parameters {
            let raw = fields.get(column).copied().unwrap_or("");
            let value = if raw.is_empty() {
                RawValue::Missing
            } else {
                let reading: i64 = raw.parse().map_err(|e| ObservationError::Parse {
                    line: line_no,
                    message: format!("invalid {code} reading '{raw}': {e}"),
                })?;
                parameter_unit(code).screen(reading)
            };
            dataset.observations.insert(station_id, hour, code, value);
        }

        first_hour = Some(first_hour.map_or(hour, |h| h.min(hour)));
        last_hour = Some(last_hour.map_or(hour, |h| h.max(hour)));
        rows += 1;
    }

    if header.is_none() {
        warn!("KNMI response contains no data header, returning an empty dataset");
        return Ok(dataset);
    }

    if let (Some(first), Some(last)) = (first_hour, last_hour) {
        dataset
            .observations
            .set_coverage(HourRange::new(first, last + Duration::hours(1)));
    }
    info!(
        "Parsed {} KNMI rows for {} stations",
        rows,
        dataset.stations.len()
    );
    Ok(dataset)
}
