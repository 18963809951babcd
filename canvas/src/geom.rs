#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas-local pixels, anchored at its top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A square of side `2 * radius` centered on `center`.
    #[must_use]
    pub fn around(center: Point, radius: f64) -> Self {
        Self { x: center.x - radius, y: center.y - radius, width: radius * 2.0, height: radius * 2.0 }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }
}

/// Clamp `value` into `[0, max]`, collapsing to zero when `max` is negative.
///
/// Unlike `f64::clamp` this never panics on an inverted range: an image
/// larger than the canvas pins to the origin.
#[must_use]
pub fn clamp_to_extent(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}
