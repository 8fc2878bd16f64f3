use crate::observations::store::ObservationStore;
use crate::types::hour_range::HourRange;
use crate::types::metric_spec::MetricEntry;
use crate::types::series::HourlySeries;
use crate::types::station::Station;

/// Builds the converted hourly series of one metric at one station.
///
/// Every hour of `window` gets a slot. A slot is missing when the station has no
/// record for that hour, the record lacks the parameter, or the reading is
/// missing or flagged.
pub fn align<S: ObservationStore + ?Sized>(
    station: &Station,
    metric: &MetricEntry,
    window: &HourRange,
    store: &S,
) -> HourlySeries {
    let values = window
        .hours()
        .map(|hour| {
            store
                .observation(station.id, hour)
                .and_then(|record| record.get(&metric.code))
                .and_then(|raw| metric.convert(*raw))
        })
        .collect();
    HourlySeries::new(window.start(), values)
}
