//! Hit regions: which interactive part of the canvas a pointer lands on.
//!
//! Regions are built fresh from the current layout and tested in order, so
//! the first match wins. The selected image's handles and controls popup come
//! first, then image bodies from topmost to bottommost. A point that matches
//! no region is "outside" every image and clears the selection.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{
    CONTROLS_HEIGHT_PX, CONTROLS_OFFSET_BELOW_PX, CONTROLS_OFFSET_X_PX, CONTROLS_WIDTH_PX, HANDLE_RADIUS_PX,
};
use crate::geom::{Point, Rect};

/// Which part of an image was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    Controls,
}

/// Resize handle position on the image's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Multipliers applied to the pointer delta on each axis: `+1` grows with
    /// positive movement, `-1` grows with negative movement, `0` ignores it.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// Handle center on `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(rect.right(), rect.y),
            Self::E => Point::new(rect.right(), cy),
            Self::Se => Point::new(rect.right(), rect.bottom()),
            Self::S => Point::new(cx, rect.bottom()),
            Self::Sw => Point::new(rect.x, rect.bottom()),
            Self::W => Point::new(rect.x, cy),
            Self::Nw => Point::new(rect.x, rect.y),
        }
    }
}

/// One testable region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub rect: Rect,
    pub index: usize,
    pub part: HitPart,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub part: HitPart,
}

/// Default floating-controls bounds for an image box: offset right of the
/// image's left edge, with its bottom edge below the image.
#[must_use]
pub fn default_controls_rect(image: &Rect) -> Rect {
    Rect::new(
        image.x + CONTROLS_OFFSET_X_PX,
        image.bottom() + CONTROLS_OFFSET_BELOW_PX - CONTROLS_HEIGHT_PX,
        CONTROLS_WIDTH_PX,
        CONTROLS_HEIGHT_PX,
    )
}

/// Build the ordered region list.
///
/// `images` are display boxes in insertion order. `controls` overrides the
/// popup bounds for the selected image when the host has measured them.
#[must_use]
pub fn build_regions(images: &[Rect], selected: Option<usize>, controls: Option<Rect>) -> Vec<Region> {
    let mut regions = Vec::with_capacity(images.len() + ResizeAnchor::ALL.len() + 1);

    if let Some((index, rect)) = selected.and_then(|i| images.get(i).map(|r| (i, r))) {
        for anchor in ResizeAnchor::ALL {
            regions.push(Region {
                rect: Rect::around(anchor.position(rect), HANDLE_RADIUS_PX),
                index,
                part: HitPart::ResizeHandle(anchor),
            });
        }
        regions.push(Region {
            rect: controls.unwrap_or_else(|| default_controls_rect(rect)),
            index,
            part: HitPart::Controls,
        });
        regions.push(Region { rect: *rect, index, part: HitPart::Body });
    }

    for (index, rect) in images.iter().enumerate().rev() {
        if Some(index) == selected {
            continue;
        }
        regions.push(Region { rect: *rect, index, part: HitPart::Body });
    }

    regions
}

/// First region containing `pt`, if any.
#[must_use]
pub fn hit_test(pt: Point, regions: &[Region]) -> Option<Hit> {
    regions
        .iter()
        .find(|region| region.rect.contains(pt))
        .map(|region| Hit { index: region.index, part: region.part })
}
