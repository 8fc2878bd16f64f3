/// How a raw integer reading maps onto a physical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `value = raw * scale + offset`
    Affine { scale: f64, offset: f64 },
    /// An amount accumulated per area over a period, turned into a mean flux:
    /// `value = raw * area_factor / period_seconds`.
    ///
    /// KNMI reports global radiation in J/cm² per hour; with `area_factor = 1e4`
    /// (cm² to m²) and `period_seconds = 3600` this yields W/m².
    Accumulated { area_factor: f64, period_seconds: f64 },
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion::Affine {
        scale: 1.0,
        offset: 0.0,
    };

    /// A plain multiplicative factor without offset.
    pub const fn factor(scale: f64) -> Self {
        Conversion::Affine { scale, offset: 0.0 }
    }

    pub fn apply(&self, raw: f64) -> f64 {
        match *self {
            Conversion::Affine { scale, offset } => raw * scale + offset,
            Conversion::Accumulated {
                area_factor,
                period_seconds,
            } => raw * area_factor / period_seconds,
        }
    }

    /// The declared inverse of [`Conversion::apply`].
    pub fn invert(&self, value: f64) -> f64 {
        match *self {
            Conversion::Affine { scale, offset } => (value - offset) / scale,
            Conversion::Accumulated {
                area_factor,
                period_seconds,
            } => value * period_seconds / area_factor,
        }
    }
}
