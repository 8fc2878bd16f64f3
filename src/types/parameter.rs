//! Defines `ParameterCode`, the KNMI hourly parameters the unit converter knows about.

use crate::error::DutchWeatherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered KNMI hourly ("uurgegevens") parameter.
///
/// The variant names match the column codes used by KNMI, see
/// <https://www.knmi.nl/nederland-nu/klimatologie/uurgegevens>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterCode {
    /// Air temperature at 1.50 m, in 0.1 °C.
    T,
    /// Dew point temperature at 1.50 m, in 0.1 °C.
    TD,
    /// Mean wind speed over the past hour, in 0.1 m/s.
    FH,
    /// Mean wind speed over the last 10 minutes of the hour, in 0.1 m/s.
    FF,
    /// Highest wind gust during the hour, in 0.1 m/s.
    FX,
    /// Global radiation, in J/cm² accumulated over the hour.
    Q,
    /// Air pressure reduced to mean sea level, in 0.1 hPa.
    P,
    /// Relative humidity at 1.50 m, in percent.
    U,
    /// Hourly precipitation amount, in 0.1 mm (-1 for less than 0.05 mm).
    RH,
    /// Precipitation duration, in 0.1 hour (-1 for less than 0.05 hour).
    DR,
    /// Sunshine duration, in 0.1 hour (-1 for less than 0.05 hour).
    SQ,
}

impl ParameterCode {
    pub const ALL: [ParameterCode; 11] = [
        ParameterCode::T,
        ParameterCode::TD,
        ParameterCode::FH,
        ParameterCode::FF,
        ParameterCode::FX,
        ParameterCode::Q,
        ParameterCode::P,
        ParameterCode::U,
        ParameterCode::RH,
        ParameterCode::DR,
        ParameterCode::SQ,
    ];

    /// The column code as it appears in KNMI data files and API requests.
    pub fn code(&self) -> &'static str {
        match self {
            ParameterCode::T => "T",
            ParameterCode::TD => "TD",
            ParameterCode::FH => "FH",
            ParameterCode::FF => "FF",
            ParameterCode::FX => "FX",
            ParameterCode::Q => "Q",
            ParameterCode::P => "P",
            ParameterCode::U => "U",
            ParameterCode::RH => "RH",
            ParameterCode::DR => "DR",
            ParameterCode::SQ => "SQ",
        }
    }
}

impl fmt::Display for ParameterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parses a KNMI column code. Codes are matched case-sensitively after trimming,
/// the way they appear in the data file header.
///
/// # Examples
///
/// ```
/// use dutch_weather::ParameterCode;
///
/// assert_eq!("FH".parse::<ParameterCode>().unwrap(), ParameterCode::FH);
/// assert!("DD".parse::<ParameterCode>().is_err());
/// ```
impl FromStr for ParameterCode {
    type Err = DutchWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ParameterCode::ALL
            .into_iter()
            .find(|code| code.code() == trimmed)
            .ok_or_else(|| DutchWeatherError::UnknownParameter(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_display() {
        for code in ParameterCode::ALL {
            let parsed: ParameterCode = code.to_string().parse().unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = "VV".parse::<ParameterCode>().unwrap_err();
        assert!(matches!(err, DutchWeatherError::UnknownParameter(code) if code == "VV"));
        assert!("t".parse::<ParameterCode>().is_err());
        assert!("".parse::<ParameterCode>().is_err());
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!("   T".parse::<ParameterCode>().unwrap(), ParameterCode::T);
    }
}
