use crate::interpolation::temporal::GapPolicy;
use crate::stations::weighting::StationSelection;
use crate::types::geo::GeoBounds;
use bon::Builder;

/// Tuning knobs of the interpolation engine.
///
/// # Examples
///
/// ```
/// use dutch_weather::{GapPolicy, InterpolationConfig, StationSelection};
///
/// let config = InterpolationConfig::builder()
///     .selection(StationSelection::WithinRadius(40.0))
///     .gap_policy(GapPolicy::Strict)
///     .build();
/// assert_eq!(config.power, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct InterpolationConfig {
    /// Which stations contribute. Defaults to the five nearest.
    #[builder(default)]
    pub selection: StationSelection,
    /// Inverse-distance exponent.
    #[builder(default = 2.0)]
    pub power: f64,
    /// Handling of missing hourly anchors. Defaults to bridging gaps of up to two hours.
    #[builder(default)]
    pub gap_policy: GapPolicy,
    /// Region in which target locations are accepted.
    #[builder(default = GeoBounds::NETHERLANDS)]
    pub bounds: GeoBounds,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InterpolationConfig::default();
        assert_eq!(config.selection, StationSelection::Nearest(5));
        assert_eq!(config.power, 2.0);
        assert_eq!(config.gap_policy, GapPolicy::Bridge { max_gap_hours: 2 });
        assert_eq!(config.bounds, GeoBounds::NETHERLANDS);
    }
}
