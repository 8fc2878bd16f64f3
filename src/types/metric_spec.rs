//! The caller's selection of output metrics.

use crate::error::DutchWeatherError;
use crate::types::observation::RawValue;
use crate::types::parameter::ParameterCode;
use crate::units::conversion::Conversion;
use crate::units::converter::parameter_unit;

/// One requested output column: which KNMI parameter feeds it, what it is called
/// and how raw readings are converted.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub code: ParameterCode,
    pub output_name: String,
    pub conversion: Conversion,
}

impl MetricEntry {
    /// Converts a raw reading for this metric. Missing and flagged readings give `None`.
    pub fn convert(&self, raw: RawValue) -> Option<f64> {
        parameter_unit(self.code).convert_with(self.conversion, raw)
    }
}

/// A validated, ordered set of metrics to interpolate.
///
/// Parameter codes are checked when a metric is added, so an unknown code is
/// rejected before any computation starts. Output names must be unique.
///
/// # Examples
///
/// ```
/// use dutch_weather::{MetricSpec, DutchWeatherError};
///
/// # fn main() -> Result<(), DutchWeatherError> {
/// let metrics = MetricSpec::new()
///     .metric("T", "temperature")?
///     .metric_with_factor("FH", "wind_km_h", 0.36)?;
/// assert_eq!(metrics.len(), 2);
///
/// assert!(MetricSpec::new().metric("ZZ", "unknown").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    entries: Vec<MetricEntry>,
}

impl MetricSpec {
    /// An empty specification.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a metric converted to the parameter's registered unit.
    pub fn metric(
        self,
        code: &str,
        output_name: impl Into<String>,
    ) -> Result<Self, DutchWeatherError> {
        let code: ParameterCode = code.parse()?;
        self.push(code, output_name.into(), parameter_unit(code).conversion)
    }

    /// Adds a metric scaled by a plain factor instead of the registered conversion.
    pub fn metric_with_factor(
        self,
        code: &str,
        output_name: impl Into<String>,
        factor: f64,
    ) -> Result<Self, DutchWeatherError> {
        self.metric_with_conversion(code, output_name, Conversion::factor(factor))
    }

    /// Adds a metric with an arbitrary conversion.
    pub fn metric_with_conversion(
        self,
        code: &str,
        output_name: impl Into<String>,
        conversion: Conversion,
    ) -> Result<Self, DutchWeatherError> {
        let code: ParameterCode = code.parse()?;
        self.push(code, output_name.into(), conversion)
    }

    fn push(
        mut self,
        code: ParameterCode,
        output_name: String,
        conversion: Conversion,
    ) -> Result<Self, DutchWeatherError> {
        if self.entries.iter().any(|e| e.output_name == output_name) {
            return Err(DutchWeatherError::DuplicateMetric(output_name));
        }
        self.entries.push(MetricEntry {
            code,
            output_name,
            conversion,
        });
        Ok(self)
    }

    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The distinct parameter codes needed, in first-use order.
    pub fn codes(&self) -> Vec<ParameterCode> {
        let mut codes: Vec<ParameterCode> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !codes.contains(&entry.code) {
                codes.push(entry.code);
            }
        }
        codes
    }
}

/// Temperature, wind speed, global horizontal irradiance, pressure and relative
/// humidity, named with their units.
impl Default for MetricSpec {
    fn default() -> Self {
        let defaults = [
            (ParameterCode::T, "temp_outdoor__degC"),
            (ParameterCode::FH, "wind__m_s_1"),
            (ParameterCode::Q, "sol_ghi__W_m_2"),
            (ParameterCode::P, "air_outdoor__Pa"),
            (ParameterCode::U, "air_outdoor_rel_humidity__0"),
        ];
        Self {
            entries: defaults
                .into_iter()
                .map(|(code, name)| MetricEntry {
                    code,
                    output_name: name.to_string(),
                    conversion: parameter_unit(code).conversion,
                })
                .collect(),
        }
    }
}
