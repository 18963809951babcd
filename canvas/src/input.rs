//! Input model: editor UI state and the gesture state machine.
//!
//! `UiState` holds the process-local editor state that is never persisted.
//! `InputState` is the active gesture between pointer-down and pointer-up,
//! carrying the preview geometry that is committed to the store on release.
//! `ImageState` is the per-image view of both, as seen by a renderer.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::hit::ResizeAnchor;

/// Which of an image's two dimension sliders is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderAxis {
    Width,
    Height,
}

/// Per-image interaction state. At most one image is ever not `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Idle,
    Selected,
    Dragging,
    Resizing,
}

/// Editor state that lives only as long as the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// Index of the selected image, if any.
    pub selected: Option<usize>,
    /// Whether the settings sidebar is expanded.
    pub sidebar_open: bool,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The selected image is following the pointer.
    Dragging {
        index: usize,
        /// Pointer position at the previous event; deltas are taken from here.
        last: Point,
        /// Clamped preview position.
        x: f64,
        y: f64,
    },
    /// The selected image is being resized from one of its handles.
    Resizing {
        index: usize,
        anchor: ResizeAnchor,
        /// Pointer position when the handle was grabbed.
        start: Point,
        orig_width: f64,
        orig_height: f64,
        /// Clamped preview size.
        width: f64,
        height: f64,
    },
}

impl InputState {
    /// Index of the image this gesture acts on.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Dragging { index, .. } | Self::Resizing { index, .. } => Some(*index),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Adjust for the removal of `removed`: a gesture on it is cancelled, a
    /// gesture on a later index follows its image down by one.
    #[must_use]
    pub fn after_removal(self, removed: usize) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Dragging { index, .. } | Self::Resizing { index, .. } if index == removed => Self::Idle,
            Self::Dragging { index, last, x, y } if index > removed => {
                Self::Dragging { index: index - 1, last, x, y }
            }
            Self::Resizing { index, anchor, start, orig_width, orig_height, width, height } if index > removed => {
                Self::Resizing { index: index - 1, anchor, start, orig_width, orig_height, width, height }
            }
            other => other,
        }
    }
}

/// Selection after `removed` is deleted.
#[must_use]
pub fn selection_after_removal(selected: Option<usize>, removed: usize) -> Option<usize> {
    match selected {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
