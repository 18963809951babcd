//! Document model: placed images, their sources, and the ordered store.
//!
//! This module defines what sits on the template canvas (`PlacedImage`,
//! `ImageSource`), a sparse-update type for incremental edits
//! (`PartialPlacedImage`), and the runtime store (`ImageStore`) that owns the
//! ordered sequence and enforces the capacity ceiling.
//!
//! Entries are addressed by their position in insertion order. Removing an
//! entry shifts every later index down by one, so callers holding indices
//! must treat them as stale after a removal.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, ROTATION_STEP_DEG};
use crate::geom::Rect;
use crate::mask::ShapeMask;

const DEGREES_PER_TURN: u16 = 360;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An index did not address a live entry. This is a caller bug: the
    /// index was captured before a removal or never existed.
    #[error("image index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

// =============================================================================
// IMAGE SOURCE
// =============================================================================

/// Where a placed image's pixels come from.
///
/// Serialized as a single string: inline data becomes a base64 `data:` URI,
/// references are written verbatim. A `data:` string that does not decode
/// stays a [`ImageSource::Uri`], so parsing never rewrites a stored value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    /// Self-contained image bytes with their MIME type.
    Inline { mime: String, data: Vec<u8> },
    /// Reference to an image held elsewhere (remote URL, preset path).
    Uri(String),
}

impl ImageSource {
    /// Wrap raw bytes as an inline source.
    #[must_use]
    pub fn inline(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Inline { mime: mime.into(), data }
    }

    /// Wrap a reference string without interpreting it.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Parse a stored `src` string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        parse_data_uri(raw).unwrap_or_else(|| Self::Uri(raw.to_owned()))
    }

    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// Bytes of an inline source.
    #[must_use]
    pub fn inline_data(&self) -> Option<&[u8]> {
        match self {
            Self::Inline { data, .. } => Some(data),
            Self::Uri(_) => None,
        }
    }

    /// The string form written to records.
    #[must_use]
    pub fn to_src(&self) -> String {
        match self {
            Self::Inline { mime, data } => format!("data:{mime};base64,{}", STANDARD.encode(data)),
            Self::Uri(uri) => uri.clone(),
        }
    }
}

fn parse_data_uri(raw: &str) -> Option<ImageSource> {
    let rest = raw.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    if mime.is_empty() {
        return None;
    }
    let Ok(data) = STANDARD.decode(payload) else {
        return None;
    };
    Some(ImageSource::Inline { mime: mime.to_owned(), data })
}

impl From<String> for ImageSource {
    fn from(raw: String) -> Self {
        match parse_data_uri(&raw) {
            Some(inline) => inline,
            None => Self::Uri(raw),
        }
    }
}

impl From<ImageSource> for String {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::Uri(uri) => uri,
            inline @ ImageSource::Inline { .. } => inline.to_src(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { mime, data } => write!(f, "Inline({mime}, {} bytes)", data.len()),
            Self::Uri(uri) => write!(f, "Uri({uri})"),
        }
    }
}

// =============================================================================
// PLACED IMAGE
// =============================================================================

/// One image instance on the canvas, as stored and as written to records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedImage {
    /// Pixel source.
    #[serde(rename = "src")]
    pub source: ImageSource,
    /// Left edge in canvas-local pixels.
    pub x: f64,
    /// Top edge in canvas-local pixels.
    pub y: f64,
    /// Box width in pixels.
    pub width: f64,
    /// Box height in pixels.
    pub height: f64,
    /// Clockwise rotation in degrees; always a multiple of 90 in `[0, 360)`.
    #[serde(rename = "rotate")]
    pub rotation: u16,
    /// Resize handles scale both axes together when set.
    #[serde(rename = "lockAspectRatio", default)]
    pub aspect_locked: bool,
    /// Clip shape.
    #[serde(rename = "shape", default)]
    pub mask: ShapeMask,
}

impl PlacedImage {
    /// A default-positioned entry: origin, 100x100, unrotated, unmasked.
    #[must_use]
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            x: 0.0,
            y: 0.0,
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
            rotation: 0,
            aspect_locked: false,
            mask: ShapeMask::None,
        }
    }

    /// Bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Advance rotation by one quarter turn, wrapping at 360.
    pub fn rotate_quarter(&mut self) {
        self.rotation = next_rotation(self.rotation);
    }
}

/// `(degrees + 90) mod 360`.
#[must_use]
pub fn next_rotation(degrees: u16) -> u16 {
    (degrees % DEGREES_PER_TURN + ROTATION_STEP_DEG) % DEGREES_PER_TURN
}

/// Snap an arbitrary stored rotation onto the quarter-turn grid in `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: u16) -> u16 {
    let wrapped = degrees % DEGREES_PER_TURN;
    wrapped - wrapped % ROTATION_STEP_DEG
}

/// Sparse update for a placed image. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialPlacedImage {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<u16>,
    pub aspect_locked: Option<bool>,
    pub mask: Option<ShapeMask>,
}

impl PartialPlacedImage {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    fn apply_to(&self, img: &mut PlacedImage) {
        if let Some(x) = self.x {
            img.x = x;
        }
        if let Some(y) = self.y {
            img.y = y;
        }
        if let Some(w) = self.width {
            img.width = w;
        }
        if let Some(h) = self.height {
            img.height = h;
        }
        if let Some(r) = self.rotation {
            img.rotation = normalize_rotation(r);
        }
        if let Some(locked) = self.aspect_locked {
            img.aspect_locked = locked;
        }
        if let Some(mask) = self.mask {
            img.mask = mask;
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Ordered, capacity-bounded sequence of placed images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    images: Vec<PlacedImage>,
    capacity: usize,
}

impl ImageStore {
    /// Create an empty store retaining at most `capacity` entries per append.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { images: Vec::new(), capacity }
    }

    /// The configured ceiling.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `entries` in order, then truncate the combined sequence to the
    /// ceiling. Existing entries always win; excess new entries are dropped.
    ///
    /// Returns the newly appended entries that survived truncation.
    pub fn append(&mut self, entries: Vec<PlacedImage>) -> &[PlacedImage] {
        let start = self.images.len();
        self.images.extend(entries);
        self.images.truncate(self.capacity.max(start));
        &self.images[start..]
    }

    /// Merge `partial` into the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn update(&mut self, index: usize, partial: &PartialPlacedImage) -> Result<(), StoreError> {
        let len = self.images.len();
        let img = self.images.get_mut(index).ok_or(StoreError::IndexOutOfRange { index, len })?;
        partial.apply_to(img);
        Ok(())
    }

    /// Remove the entry at `index`, shifting later entries down.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn remove(&mut self, index: usize) -> Result<PlacedImage, StoreError> {
        if index >= self.images.len() {
            return Err(StoreError::IndexOutOfRange { index, len: self.images.len() });
        }
        Ok(self.images.remove(index))
    }

    /// Rotate the entry at `index` one quarter turn and return the new angle.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn rotate(&mut self, index: usize) -> Result<u16, StoreError> {
        let len = self.images.len();
        let img = self.images.get_mut(index).ok_or(StoreError::IndexOutOfRange { index, len })?;
        img.rotate_quarter();
        Ok(img.rotation)
    }

    /// Replace the whole sequence with a hydrated snapshot. Not truncated:
    /// a record saved under a larger ceiling loads intact.
    pub fn load_snapshot(&mut self, images: Vec<PlacedImage>) {
        self.images = images;
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedImage> {
        self.images.get(index)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Whether another append would retain at least one entry.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.images.len() < self.capacity
    }
}
