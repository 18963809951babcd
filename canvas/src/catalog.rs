//! Preset catalog of stickers and frames.
//!
//! Catalog entries are references, not inline data: the host serves the
//! preset assets, and a picked preset becomes a single default-positioned
//! placed image pointing at that asset.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use crate::doc::{ImageSource, PlacedImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Sticker,
    Frame,
}

/// One preset asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Stable identifier used by pickers.
    pub id: &'static str,
    pub kind: CatalogKind,
    /// Display name.
    pub name: &'static str,
    /// Asset path served by the host.
    pub src: &'static str,
}

impl CatalogItem {
    #[must_use]
    pub fn to_placed_image(&self) -> PlacedImage {
        PlacedImage::new(ImageSource::uri(self.src))
    }
}

pub const CATALOG: &[CatalogItem] = &[
    CatalogItem { id: "sticker-heart", kind: CatalogKind::Sticker, name: "Heart", src: "/assets/stickers/heart.png" },
    CatalogItem { id: "sticker-star", kind: CatalogKind::Sticker, name: "Star", src: "/assets/stickers/star.png" },
    CatalogItem { id: "sticker-leaf", kind: CatalogKind::Sticker, name: "Leaf", src: "/assets/stickers/leaf.png" },
    CatalogItem { id: "sticker-sun", kind: CatalogKind::Sticker, name: "Sun", src: "/assets/stickers/sun.png" },
    CatalogItem { id: "frame-gold", kind: CatalogKind::Frame, name: "Gold", src: "/assets/frames/gold.png" },
    CatalogItem { id: "frame-oak", kind: CatalogKind::Frame, name: "Oak", src: "/assets/frames/oak.png" },
    CatalogItem { id: "frame-polaroid", kind: CatalogKind::Frame, name: "Polaroid", src: "/assets/frames/polaroid.png" },
];

/// Look up a preset by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.id == id)
}

/// Presets of one kind, in catalog order.
pub fn of_kind(kind: CatalogKind) -> impl Iterator<Item = &'static CatalogItem> {
    CATALOG.iter().filter(move |item| item.kind == kind)
}
