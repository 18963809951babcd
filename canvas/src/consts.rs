//! Shared numeric constants for the canvas crate.

// ── Placement ───────────────────────────────────────────────────

/// Width of a freshly ingested image, in pixels.
pub const DEFAULT_IMAGE_WIDTH: f64 = 100.0;

/// Height of a freshly ingested image, in pixels.
pub const DEFAULT_IMAGE_HEIGHT: f64 = 100.0;

/// Capacity ceiling used when the host does not configure one.
pub const DEFAULT_MAX_IMAGES: usize = 10;

// ── Sizing ──────────────────────────────────────────────────────

/// Lower bound for slider-driven width/height.
pub const SLIDER_MIN_PX: f64 = 20.0;

/// Upper bound for slider-driven width/height.
pub const SLIDER_MAX_PX: f64 = 500.0;

/// Smallest size a resize handle can shrink an image to.
pub const MIN_RESIZE_PX: f64 = 1.0;

/// One quarter turn, the only rotation step.
pub const ROTATION_STEP_DEG: u16 = 90;

// ── Hit-testing ─────────────────────────────────────────────────

/// Half the side of a square resize handle, in pixels.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Horizontal offset of the controls popup from the image's left edge.
pub const CONTROLS_OFFSET_X_PX: f64 = 80.0;

/// Distance between the image's bottom edge and the popup's bottom edge.
pub const CONTROLS_OFFSET_BELOW_PX: f64 = 112.0;

/// Default popup width when the host has not reported its layout.
pub const CONTROLS_WIDTH_PX: f64 = 200.0;

/// Default popup height when the host has not reported its layout.
pub const CONTROLS_HEIGHT_PX: f64 = 120.0;
