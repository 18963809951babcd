//! Ingestion normalizers: turn raw image sources into default placed images.
//!
//! The host does the I/O (file reads, proxy fetches) and hands the resulting
//! bytes here. Everything in this module is synchronous and pure, so one
//! ingestion batch always becomes one ordered `Vec<PlacedImage>` that the
//! editor appends in a single step.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use crate::doc::{ImageSource, PlacedImage};

/// Where a batch of images came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestChannel {
    LocalFiles,
    UrlList,
    Catalog,
}

/// Raw bytes for one image, as produced by a file read or a proxy fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl RawImage {
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { mime: mime.into(), bytes }
    }

    /// Self-contained source that survives serialization.
    #[must_use]
    pub fn into_source(self) -> ImageSource {
        ImageSource::inline(self.mime, self.bytes)
    }
}

/// Split a free-text URL block on commas and newlines, trimming each piece
/// and dropping empties. Order is preserved.
#[must_use]
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect()
}

/// One default-positioned entry per raw image, in order.
#[must_use]
pub fn entries_from_raw(images: Vec<RawImage>) -> Vec<PlacedImage> {
    images.into_iter().map(|raw| PlacedImage::new(raw.into_source())).collect()
}

/// Keep only the successful results of a batch, preserving their relative
/// order. A failed slot is dropped without affecting its neighbours.
#[must_use]
pub fn surviving<T, E>(results: Vec<Result<T, E>>) -> Vec<T> {
    results.into_iter().filter_map(Result::ok).collect()
}
