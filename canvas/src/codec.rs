//! Template codec: value snapshots of a composition and the raster-export seam.
//!
//! `TemplateRecord` is the transportable form persisted by the backend and
//! the local slot. It never references the live store; [`serialize`] copies,
//! [`deserialize`] produces fresh values.
//!
//! `RenderRegion` is the fully resolved scene handed to a [`RasterExporter`]:
//! pixel dimensions, background, and every image as currently positioned,
//! rotated, and masked, in draw order.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ImageSource, PlacedImage, normalize_rotation};
use crate::mask::ShapeMask;
use crate::surface::Canvas;
use crate::units::Unit;

// =============================================================================
// RECORD
// =============================================================================

/// Serialized snapshot of a full composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub unit: Unit,
    /// Live image count at save time. Older records may omit it.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub live_count: Option<usize>,
    pub width_input: f64,
    pub height_input: f64,
    #[serde(rename = "bgColor")]
    pub background_color: String,
    #[serde(rename = "bgImg", default)]
    pub background_image: Option<ImageSource>,
    #[serde(default)]
    pub images: Vec<PlacedImage>,
}

impl TemplateRecord {
    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for well-formed values.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `raw` is not a valid record.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// A composition rebuilt from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub canvas: Canvas,
    pub images: Vec<PlacedImage>,
    /// The record's live count, or the image list length when absent.
    pub live_count: usize,
}

/// Snapshot a canvas and its images.
#[must_use]
pub fn serialize(canvas: &Canvas, images: &[PlacedImage]) -> TemplateRecord {
    TemplateRecord {
        unit: canvas.unit.clone(),
        live_count: Some(images.len()),
        width_input: canvas.width_input,
        height_input: canvas.height_input,
        background_color: canvas.background_color.clone(),
        background_image: canvas.background_image.clone(),
        images: images.to_vec(),
    }
}

/// Rebuild a composition from a record. Rotations are snapped back onto the
/// quarter-turn grid.
#[must_use]
pub fn deserialize(record: TemplateRecord) -> Composition {
    let live_count = record.live_count.unwrap_or(record.images.len());
    let images = record
        .images
        .into_iter()
        .map(|mut img| {
            img.rotation = normalize_rotation(img.rotation);
            img
        })
        .collect();
    Composition {
        canvas: Canvas {
            width_input: record.width_input,
            height_input: record.height_input,
            unit: record.unit,
            background_color: record.background_color,
            background_image: record.background_image,
        },
        images,
        live_count,
    }
}

// =============================================================================
// RASTER EXPORT
// =============================================================================

/// One image as it appears in the rendered canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub source: ImageSource,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: u16,
    pub mask: ShapeMask,
}

impl From<&PlacedImage> for RenderLayer {
    fn from(img: &PlacedImage) -> Self {
        Self {
            source: img.source.clone(),
            x: img.x,
            y: img.y,
            width: img.width,
            height: img.height,
            rotation: img.rotation,
            mask: img.mask,
        }
    }
}

/// A stable, fully resolved view of the canvas for flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRegion {
    pub width_px: f64,
    pub height_px: f64,
    pub background_color: String,
    pub background_image: Option<ImageSource>,
    /// Bottom to top.
    pub layers: Vec<RenderLayer>,
}

impl RenderRegion {
    #[must_use]
    pub fn capture(canvas: &Canvas, images: &[PlacedImage]) -> Self {
        Self {
            width_px: canvas.pixel_width(),
            height_px: canvas.pixel_height(),
            background_color: canvas.background_color.clone(),
            background_image: canvas.background_image.clone(),
            layers: images.iter().map(RenderLayer::from).collect(),
        }
    }
}

/// A downloadable encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("canvas region is empty ({width} x {height} px)")]
    EmptyRegion { width: f64, height: f64 },
    #[error("failed to decode layer {layer}: {message}")]
    Decode { layer: usize, message: String },
    #[error("failed to decode background image: {0}")]
    Background(String),
    #[error("raster of {width} x {height} px exceeds the {max_pixels} pixel export limit")]
    TooLarge { width: u32, height: u32, max_pixels: u64 },
    #[error("failed to encode raster: {0}")]
    Encode(String),
}

/// Collaborator that flattens a rendered region into one raster image.
pub trait RasterExporter {
    /// # Errors
    ///
    /// Returns an error if the region cannot be rasterized or encoded.
    fn export(&self, region: &RenderRegion) -> Result<ExportedImage, ExportError>;
}
