//! Raster export: flatten a `RenderRegion` into one PNG with the `image` crate.
//!
//! Layers are drawn in insertion order over the background. Each layer is
//! scaled to cover its box, turned about the box centre in quarter turns
//! with the overflow cropped, then clipped by its shape mask. Only inline
//! sources can be drawn; remote references are skipped.
//!
//! The region and every layer box are checked against a pixel budget before
//! any buffer is allocated.

use std::io::Cursor;

use canvas::codec::{ExportError, ExportedImage, RasterExporter, RenderLayer, RenderRegion};
use canvas::surface::parse_hex_color;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_EXPORT_PIXELS;

const PNG_MIME: &str = "image/png";
const FALLBACK_BACKGROUND: [u8; 3] = [0xff, 0xff, 0xff];
const BYTES_PER_PIXEL: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRasterExporter {
    max_pixels: u64,
}

impl Default for ImageRasterExporter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EXPORT_PIXELS)
    }
}

impl ImageRasterExporter {
    #[must_use]
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    #[must_use]
    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    /// Reject buffers over the pixel budget or beyond addressable memory.
    fn check_size(&self, width: u32, height: u32) -> Result<(), ExportError> {
        let pixels = u64::from(width).checked_mul(u64::from(height));
        let fits = pixels
            .filter(|px| *px <= self.max_pixels)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
            .is_some_and(|bytes| usize::try_from(bytes).is_ok());
        if fits { Ok(()) } else { Err(ExportError::TooLarge { width, height, max_pixels: self.max_pixels }) }
    }
}

impl RasterExporter for ImageRasterExporter {
    fn export(&self, region: &RenderRegion) -> Result<ExportedImage, ExportError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(region.width_px) || !valid(region.height_px) {
            return Err(ExportError::EmptyRegion { width: region.width_px, height: region.height_px });
        }
        let (width, height) = (to_dim(region.width_px), to_dim(region.height_px));
        self.check_size(width, height)?;

        let [r, g, b] = parse_hex_color(&region.background_color).unwrap_or(FALLBACK_BACKGROUND);
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0xff]));

        if let Some(background) = &region.background_image {
            match background.inline_data() {
                Some(data) => {
                    let decoded = image::load_from_memory(data).map_err(|e| ExportError::Background(e.to_string()))?;
                    let cover = decoded.resize_to_fill(width, height, FilterType::Triangle).to_rgba8();
                    imageops::overlay(&mut canvas, &cover, 0, 0);
                }
                None => warn!(src = %background.to_src(), "remote background skipped in raster export"),
            }
        }

        for (index, layer) in region.layers.iter().enumerate() {
            let Some(data) = layer.source.inline_data() else {
                warn!(index, src = %layer.source.to_src(), "remote layer skipped in raster export");
                continue;
            };
            let (tile_width, tile_height) = (to_dim(layer.width), to_dim(layer.height));
            self.check_size(tile_width, tile_height)?;
            let decoded =
                image::load_from_memory(data).map_err(|e| ExportError::Decode { layer: index, message: e.to_string() })?;
            let tile = render_layer(&decoded, layer, tile_width, tile_height);
            imageops::overlay(&mut canvas, &tile, to_offset(layer.x), to_offset(layer.y));
        }

        let mut out = Cursor::new(Vec::new());
        canvas.write_to(&mut out, ImageFormat::Png).map_err(|e| ExportError::Encode(e.to_string()))?;
        let bytes = out.into_inner();
        debug!(width, height, layers = region.layers.len(), len = bytes.len(), "raster exported");
        Ok(ExportedImage { mime: PNG_MIME, bytes })
    }
}

/// Cover, turn, and clip one layer to its `width` x `height` box.
fn render_layer(decoded: &DynamicImage, layer: &RenderLayer, width: u32, height: u32) -> RgbaImage {
    let cover = decoded.resize_to_fill(width, height, FilterType::Triangle);
    let mut tile = match layer.rotation {
        90 => centred(&cover.rotate90().to_rgba8(), width, height),
        180 => cover.rotate180().to_rgba8(),
        270 => centred(&cover.rotate270().to_rgba8(), width, height),
        _ => cover.to_rgba8(),
    };

    let (w, h) = (f64::from(width), f64::from(height));
    for (px, py, pixel) in tile.enumerate_pixels_mut() {
        if !layer.mask.contains(f64::from(px) + 0.5, f64::from(py) + 0.5, w, h) {
            pixel.0[3] = 0;
        }
    }
    tile
}

/// Centre a quarter-turned tile in a transparent `width` x `height` box.
/// Whatever falls outside the box is cropped.
fn centred(turned: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut tile = RgbaImage::new(width, height);
    let dx = (i64::from(width) - i64::from(turned.width())) / 2;
    let dy = (i64::from(height) - i64::from(turned.height())) / 2;
    imageops::overlay(&mut tile, turned, dx, dy);
    tile
}

/// Pixel extent, at least one pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_dim(value: f64) -> u32 {
    if value.is_finite() { value.round().clamp(1.0, f64::from(u32::MAX)) as u32 } else { 1 }
}

#[allow(clippy::cast_possible_truncation)]
fn to_offset(value: f64) -> i64 {
    if value.is_finite() { value.round() as i64 } else { 0 }
}

#[cfg(test)]
#[path = "raster_test.rs"]
mod tests;
