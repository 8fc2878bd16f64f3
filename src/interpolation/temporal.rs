//! Resampling an hourly series onto a regular grid of arbitrary spacing.

use crate::error::DutchWeatherError;
use crate::types::series::{HourlySeries, InterpolatedSeries};
use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// How missing hourly anchors are handled while resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// Looks past missing anchors. Each output timestamp uses the nearest valid
    /// anchor at or before it and the nearest valid anchor at or after it, each no
    /// further than `max_gap_hours` away (at least one hour). Interpolates between
    /// the two, or holds the value if only one of them exists.
    Bridge { max_gap_hours: u32 },
    /// Only the two anchors bracketing a timestamp are used; if either is missing
    /// the timestamp cannot be resolved.
    Strict,
}

impl GapPolicy {
    pub const DEFAULT_MAX_GAP_HOURS: u32 = 2;
}

impl Default for GapPolicy {
    fn default() -> Self {
        GapPolicy::Bridge {
            max_gap_hours: Self::DEFAULT_MAX_GAP_HOURS,
        }
    }
}

/// Number of output rows for a window: `ceil((end - start) / interval)`.
pub fn sample_count(start: DateTime<Utc>, end: DateTime<Utc>, interval: Duration) -> usize {
    let span = (end - start).num_milliseconds();
    let step = interval.num_milliseconds();
    if span <= 0 || step <= 0 {
        return 0;
    }
    ((span + step - 1) / step) as usize
}

fn lerp(t0: i64, v0: f64, t1: i64, v1: f64, t: i64) -> f64 {
    if t1 == t0 {
        return v0;
    }
    v0 + (v1 - v0) * ((t - t0) as f64 / (t1 - t0) as f64)
}

/// Resolves the value at `offset` milliseconds after the first anchor.
/// `index` is the anchor at or before `offset` and exists.
fn value_at(hourly: &HourlySeries, index: usize, offset: i64, policy: GapPolicy) -> Option<f64> {
    let anchor_ms = |i: usize| i as i64 * MILLIS_PER_HOUR;
    let on_anchor = offset == anchor_ms(index);

    if on_anchor {
        if let Some(value) = hourly.get(index) {
            return Some(value);
        }
    }

    match policy {
        GapPolicy::Strict => {
            if on_anchor {
                return None;
            }
            let v0 = hourly.get(index)?;
            if index + 1 >= hourly.len() {
                return Some(v0);
            }
            let v1 = hourly.get(index + 1)?;
            Some(lerp(anchor_ms(index), v0, anchor_ms(index + 1), v1, offset))
        }
        GapPolicy::Bridge { max_gap_hours } => {
            let reach = i64::from(max_gap_hours.max(1)) * MILLIS_PER_HOUR;

            let before = (0..=index)
                .rev()
                .take_while(|&i| offset - anchor_ms(i) <= reach)
                .find_map(|i| hourly.get(i).map(|v| (anchor_ms(i), v)));
            let after = (index + 1..hourly.len())
                .take_while(|&i| anchor_ms(i) - offset <= reach)
                .find_map(|i| hourly.get(i).map(|v| (anchor_ms(i), v)));

            match (before, after) {
                (Some((t0, v0)), Some((t1, v1))) => Some(lerp(t0, v0, t1, v1, offset)),
                (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
                (None, None) => None,
            }
        }
    }
}

/// Resamples `hourly` onto `start + k * interval` for `k < ceil((end - start) / interval)`.
///
/// Values between two anchors are linearly interpolated. A timestamp after the last
/// anchor but within its hour holds the last value.
///
/// # Errors
///
/// - [`DutchWeatherError::InvalidInterval`] for a zero interval.
/// - [`DutchWeatherError::InvalidWindow`] unless `start < end`.
/// - [`DutchWeatherError::Range`] if a timestamp lies before the first anchor, or an
///   hour or more past the last.
/// - [`DutchWeatherError::UnresolvedGap`] if missing anchors around a timestamp cannot
///   be bridged under `policy`.
pub fn resample(
    hourly: &HourlySeries,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: u32,
    policy: GapPolicy,
) -> Result<InterpolatedSeries, DutchWeatherError> {
    if interval_minutes == 0 {
        return Err(DutchWeatherError::InvalidInterval(interval_minutes));
    }
    if start >= end {
        return Err(DutchWeatherError::InvalidWindow { start, end });
    }

    let interval = Duration::minutes(i64::from(interval_minutes));
    let count = sample_count(start, end, interval);
    let origin = hourly.start();
    let step_ms = interval.num_milliseconds();
    let start_offset = (start - origin).num_milliseconds();

    let mut values = Vec::with_capacity(count);
    for k in 0..count {
        let offset = start_offset + k as i64 * step_ms;
        let index = offset.div_euclid(MILLIS_PER_HOUR);
        if offset < 0 || index >= hourly.len() as i64 {
            return Err(DutchWeatherError::Range {
                start,
                end,
                available_start: origin,
                available_end: hourly.end(),
            });
        }
        let timestamp = origin + Duration::milliseconds(offset);
        let value = value_at(hourly, index as usize, offset, policy)
            .ok_or(DutchWeatherError::UnresolvedGap { timestamp })?;
        values.push(value);
    }

    Ok(InterpolatedSeries::new(start, interval, values))
}
