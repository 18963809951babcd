//! Canvas settings: user-entered dimensions, unit, and background.
//!
//! Pixel dimensions are never stored. Every read goes through
//! [`crate::units::to_pixels`] so a change to the inputs or the unit is
//! reflected immediately.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::doc::ImageSource;
use crate::units::{Unit, to_pixels};

/// Background color used for a new canvas.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Initial width input for a new canvas, in [`Unit::Cm`].
pub const DEFAULT_WIDTH_INPUT: f64 = 30.0;

/// Initial height input for a new canvas, in [`Unit::Cm`].
pub const DEFAULT_HEIGHT_INPUT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    Dimension { field: &'static str, value: f64 },
    #[error("invalid color '{0}' (expected #rgb or #rrggbb)")]
    Color(String),
}

/// The editing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width_input: f64,
    pub height_input: f64,
    pub unit: Unit,
    pub background_color: String,
    pub background_image: Option<ImageSource>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width_input: DEFAULT_WIDTH_INPUT,
            height_input: DEFAULT_HEIGHT_INPUT,
            unit: Unit::Cm,
            background_color: DEFAULT_BACKGROUND.to_owned(),
            background_image: None,
        }
    }
}

impl Canvas {
    #[must_use]
    pub fn pixel_width(&self) -> f64 {
        to_pixels(self.width_input, &self.unit)
    }

    #[must_use]
    pub fn pixel_height(&self) -> f64 {
        to_pixels(self.height_input, &self.unit)
    }

    /// Replace both dimension inputs.
    ///
    /// # Errors
    ///
    /// Rejects NaN, infinite, and negative values; the canvas is left unchanged.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Result<(), ValidationError> {
        validate_dimension("width", width)?;
        validate_dimension("height", height)?;
        self.width_input = width;
        self.height_input = height;
        Ok(())
    }

    /// Replace the background color.
    ///
    /// # Errors
    ///
    /// Rejects anything that is not `#rgb` or `#rrggbb`.
    pub fn set_background_color(&mut self, color: &str) -> Result<(), ValidationError> {
        if parse_hex_color(color).is_none() {
            return Err(ValidationError::Color(color.to_owned()));
        }
        color.clone_into(&mut self.background_color);
        Ok(())
    }
}

fn validate_dimension(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Dimension { field, value })
    }
}

/// Parse a `#rgb` or `#rrggbb` color into RGB bytes.
#[must_use]
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    let digits: Vec<u32> = hex.chars().map(|c| c.to_digit(16)).collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some([byte(r * 17), byte(g * 17), byte(b * 17)]),
        [r1, r2, g1, g2, b1, b2] => Some([byte(r1 * 16 + r2), byte(g1 * 16 + g2), byte(b1 * 16 + b2)]),
        _ => None,
    }
}

fn byte(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
