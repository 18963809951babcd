//! User-unit to pixel conversion.
//!
//! The scale factors are the on-screen calibration the template editor has
//! always used; they are not physical DPI conversions. A unit tag that is not
//! one of the three known units converts with a factor of one.

#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pixels per centimetre.
pub const CM_SCALE: f64 = 0.6;
/// Pixels per metre.
pub const M_SCALE: f64 = 60.0;
/// Pixels per foot.
pub const FT_SCALE: f64 = 20.0;

/// Measurement unit for the canvas dimension inputs.
///
/// Serialized as its tag string. Tags other than `cm`, `m`, and `ft` are kept
/// verbatim in [`Unit::Other`] so a stored record survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// Centimetres.
    #[default]
    Cm,
    /// Metres.
    M,
    /// Feet.
    Ft,
    /// Unrecognized tag, converted with a factor of one.
    Other(String),
}

impl Unit {
    /// Parse a unit tag. Never fails; unknown tags become [`Unit::Other`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "cm" => Self::Cm,
            "m" => Self::M,
            "ft" => Self::Ft,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The tag string for this unit.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Cm => "cm",
            Self::M => "m",
            Self::Ft => "ft",
            Self::Other(tag) => tag,
        }
    }

    /// Pixels per unit, or `None` for an unrecognized tag.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Cm => Some(CM_SCALE),
            Self::M => Some(M_SCALE),
            Self::Ft => Some(FT_SCALE),
            Self::Other(_) => None,
        }
    }

    /// Whether this is one of the three supported units.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.scale().is_some()
    }
}

impl From<String> for Unit {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Other(tag) => tag,
            known => known.tag().to_owned(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Convert a dimension in `unit` to on-screen pixels.
#[must_use]
pub fn to_pixels(value: f64, unit: &Unit) -> f64 {
    value * unit.scale().unwrap_or(1.0)
}
