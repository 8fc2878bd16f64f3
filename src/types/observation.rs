use crate::types::parameter::ParameterCode;
use std::collections::BTreeMap;

/// A raw station reading as reported by the provider, before unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    /// A reading in the provider's integer units.
    Value(i64),
    /// Nothing was reported.
    Missing,
    /// A reading was reported but failed the plausibility screen for its parameter.
    Flagged(i64),
}

impl RawValue {
    /// The raw reading if it is usable, `None` for missing or flagged values.
    pub fn valid(&self) -> Option<i64> {
        match self {
            RawValue::Value(v) => Some(*v),
            RawValue::Missing | RawValue::Flagged(_) => None,
        }
    }
}

/// All parameters reported by one station for one hour.
pub type ObservationRecord = BTreeMap<ParameterCode, RawValue>;
