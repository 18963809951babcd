//! Shape masks: the closed set of clip geometries an image can be shown through.
//!
//! Each [`ShapeMask`] resolves to a [`ClipGeometry`] through [`CLIP_TABLE`].
//! Geometry is expressed relative to the image's box so the same definition
//! drives CSS clip paths for the host renderer and per-pixel coverage for
//! raster export.

#[cfg(test)]
#[path = "mask_test.rs"]
mod mask_test;

use serde::{Deserialize, Serialize};

/// Clip shape applied to a placed image's rendered bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMask {
    /// Full rectangular box.
    #[default]
    None,
    /// Centered circle.
    Circle,
    /// Flat-topped hexagon.
    Hexagon,
}

/// Clip geometry in box-relative fractions (`0.0..=1.0` on each axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipGeometry {
    /// No clipping.
    Unclipped,
    /// Circle centered in the box with `radius` as a fraction of the box's
    /// reference length `sqrt((w² + h²) / 2)`, matching CSS `circle(50%)`.
    Circle { radius: f64 },
    /// Closed polygon with vertices in box-relative fractions.
    Polygon(&'static [(f64, f64)]),
}

/// Hexagon vertices, clockwise from the top-left corner.
pub const HEXAGON_VERTICES: [(f64, f64); 6] =
    [(0.25, 0.067), (0.75, 0.067), (1.0, 0.5), (0.75, 0.933), (0.25, 0.933), (0.0, 0.5)];

/// Mask-to-geometry lookup table.
pub const CLIP_TABLE: [(ShapeMask, ClipGeometry); 3] = [
    (ShapeMask::None, ClipGeometry::Unclipped),
    (ShapeMask::Circle, ClipGeometry::Circle { radius: 0.5 }),
    (ShapeMask::Hexagon, ClipGeometry::Polygon(&HEXAGON_VERTICES)),
];

impl ShapeMask {
    /// All masks in presentation order.
    pub const ALL: [Self; 3] = [Self::None, Self::Circle, Self::Hexagon];

    /// Resolve this mask's clip geometry.
    #[must_use]
    pub fn geometry(self) -> ClipGeometry {
        CLIP_TABLE
            .iter()
            .find(|(mask, _)| *mask == self)
            .map_or(ClipGeometry::Unclipped, |(_, geometry)| *geometry)
    }

    /// Human-readable label for controls.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Circle => "Circle",
            Self::Hexagon => "Hexagon",
        }
    }

    /// CSS `clip-path` value for hosts that render through the DOM.
    #[must_use]
    pub fn css_clip_path(self) -> String {
        self.geometry().css_clip_path()
    }

    /// Whether the point `(px, py)`, relative to the top-left of a
    /// `width` x `height` box, lies inside the mask.
    #[must_use]
    pub fn contains(self, px: f64, py: f64, width: f64, height: f64) -> bool {
        self.geometry().contains(px, py, width, height)
    }
}

impl ClipGeometry {
    #[must_use]
    pub fn css_clip_path(&self) -> String {
        match self {
            Self::Unclipped => "none".to_owned(),
            Self::Circle { radius } => format!("circle({}%)", format_percent(*radius)),
            Self::Polygon(vertices) => {
                let points: Vec<String> = vertices
                    .iter()
                    .map(|(u, v)| format!("{}% {}%", format_percent(*u), format_percent(*v)))
                    .collect();
                format!("polygon({})", points.join(", "))
            }
        }
    }

    #[must_use]
    pub fn contains(&self, px: f64, py: f64, width: f64, height: f64) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        match self {
            Self::Unclipped => px >= 0.0 && px <= width && py >= 0.0 && py <= height,
            Self::Circle { radius } => {
                let reference = ((width * width + height * height) / 2.0).sqrt();
                let r = radius * reference;
                let dx = px - width / 2.0;
                let dy = py - height / 2.0;
                dx * dx + dy * dy <= r * r
            }
            Self::Polygon(vertices) => point_in_polygon(px / width, py / height, vertices),
        }
    }
}

fn format_percent(fraction: f64) -> String {
    let pct = (fraction * 1000.0).round() / 10.0;
    format!("{pct}")
}

/// Even-odd ray cast against a closed polygon.
fn point_in_polygon(u: f64, v: f64, vertices: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > v) != (yj > v) && u < (xj - xi) * (v - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
