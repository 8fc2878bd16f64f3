//! The declarative table mapping KNMI hourly parameters onto SI-derived units.

use crate::error::DutchWeatherError;
use crate::types::observation::RawValue;
use crate::types::parameter::ParameterCode;
use crate::units::conversion::Conversion;

/// Unit metadata for one registered parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterUnit {
    pub code: ParameterCode,
    /// Unit of the converted value.
    pub unit: &'static str,
    pub conversion: Conversion,
    /// Raw code KNMI uses for "more than zero but below half a unit". Converts to zero.
    pub trace_raw: Option<i64>,
    /// Plausible raw readings, inclusive. Readings outside are flagged as invalid.
    pub valid_raw: (i64, i64),
}

impl ParameterUnit {
    /// Classifies a reported raw reading, flagging implausible values.
    pub fn screen(&self, raw: i64) -> RawValue {
        let (low, high) = self.valid_raw;
        if (low..=high).contains(&raw) {
            RawValue::Value(raw)
        } else {
            RawValue::Flagged(raw)
        }
    }

    /// Converts with this parameter's own conversion.
    pub fn convert(&self, raw: RawValue) -> Option<f64> {
        self.convert_with(self.conversion, raw)
    }

    /// Converts with a caller-supplied conversion, keeping this parameter's
    /// missing and trace semantics.
    pub fn convert_with(&self, conversion: Conversion, raw: RawValue) -> Option<f64> {
        let raw = raw.valid()?;
        if self.trace_raw == Some(raw) {
            return Some(conversion.apply(0.0));
        }
        Some(conversion.apply(raw as f64))
    }
}

const TENTH: Conversion = Conversion::factor(0.1);

const PARAMETER_TABLE: [ParameterUnit; 11] = [
    ParameterUnit {
        code: ParameterCode::T,
        unit: "°C",
        conversion: TENTH,
        trace_raw: None,
        valid_raw: (-600, 600),
    },
    ParameterUnit {
        code: ParameterCode::TD,
        unit: "°C",
        conversion: TENTH,
        trace_raw: None,
        valid_raw: (-600, 600),
    },
    ParameterUnit {
        code: ParameterCode::FH,
        unit: "m/s",
        conversion: TENTH,
        trace_raw: None,
        valid_raw: (0, 750),
    },
    ParameterUnit {
        code: ParameterCode::FF,
        unit: "m/s",
        conversion: TENTH,
        trace_raw: None,
        valid_raw: (0, 750),
    },
    ParameterUnit {
        code: ParameterCode::FX,
        unit: "m/s",
        conversion: TENTH,
        trace_raw: None,
        valid_raw: (0, 1000),
    },
    ParameterUnit {
        code: ParameterCode::Q,
        unit: "W/m²",
        conversion: Conversion::Accumulated {
            area_factor: 100.0 * 100.0,
            period_seconds: 60.0 * 60.0,
        },
        trace_raw: None,
        valid_raw: (0, 500),
    },
    ParameterUnit {
        code: ParameterCode::P,
        unit: "Pa",
        conversion: Conversion::factor(0.1 * 100.0),
        trace_raw: None,
        valid_raw: (8_500, 11_000),
    },
    ParameterUnit {
        code: ParameterCode::U,
        unit: "1",
        conversion: Conversion::factor(0.01),
        trace_raw: None,
        valid_raw: (0, 100),
    },
    ParameterUnit {
        code: ParameterCode::RH,
        unit: "mm",
        conversion: TENTH,
        trace_raw: Some(-1),
        valid_raw: (-1, 2_000),
    },
    ParameterUnit {
        code: ParameterCode::DR,
        unit: "h",
        conversion: TENTH,
        trace_raw: Some(-1),
        valid_raw: (-1, 10),
    },
    ParameterUnit {
        code: ParameterCode::SQ,
        unit: "h",
        conversion: TENTH,
        trace_raw: Some(-1),
        valid_raw: (-1, 10),
    },
];

/// Unit metadata for a registered parameter.
pub fn parameter_unit(code: ParameterCode) -> &'static ParameterUnit {
    // Every ParameterCode has exactly one row, in declaration order.
    &PARAMETER_TABLE[code as usize]
}

/// All registered parameters.
pub fn parameter_table() -> &'static [ParameterUnit] {
    &PARAMETER_TABLE
}

/// Converts a raw reading for a textual parameter code into its physical value.
///
/// Missing and flagged readings convert to `None`.
///
/// # Errors
///
/// Returns [`DutchWeatherError::UnknownParameter`] if `code` is not registered.
///
/// # Examples
///
/// ```
/// use dutch_weather::{convert, RawValue};
///
/// let celsius = convert("T", RawValue::Value(100)).unwrap();
/// assert_eq!(celsius, Some(10.0));
/// assert_eq!(convert("T", RawValue::Missing).unwrap(), None);
/// assert!(convert("XX", RawValue::Value(1)).is_err());
/// ```
pub fn convert(code: &str, raw: RawValue) -> Result<Option<f64>, DutchWeatherError> {
    let code: ParameterCode = code.parse()?;
    Ok(parameter_unit(code).convert(raw))
}
