use crate::catalog::CatalogItem;
use crate::codec::{self, RenderRegion, TemplateRecord};
use crate::consts::{DEFAULT_MAX_IMAGES, MIN_RESIZE_PX, SLIDER_MAX_PX, SLIDER_MIN_PX};
use crate::doc::{ImageSource, ImageStore, PartialPlacedImage, PlacedImage, StoreError};
use crate::geom::{Point, Rect, clamp_to_extent};
use crate::hit::{self, HitPart, Region, ResizeAnchor};
use crate::input::{ImageState, InputState, SliderAxis, UiState, selection_after_removal};
use crate::mask::ShapeMask;
use crate::surface::{Canvas, ValidationError};
use crate::units::Unit;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from editor operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `count` entries were appended starting at `start`; `dropped` entries of
    /// the batch fell past the capacity ceiling.
    ImagesAppended { start: usize, count: usize, dropped: usize },
    ImageUpdated { index: usize, fields: PartialPlacedImage },
    ImageDeleted { index: usize },
    SelectionChanged(Option<usize>),
    CanvasChanged,
    /// The whole composition was replaced from a record.
    Hydrated { images: usize, recorded_count: usize },
    RenderNeeded,
}

/// Editor state and every operation on it. Holds no I/O handles.
pub struct EditorCore {
    canvas: Canvas,
    store: ImageStore,
    ui: UiState,
    input: InputState,
    controls_region: Option<Rect>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_IMAGES)
    }
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor whose store retains at most `max_images` entries.
    #[must_use]
    pub fn with_capacity(max_images: usize) -> Self {
        Self {
            canvas: Canvas::default(),
            store: ImageStore::with_capacity(max_images),
            ui: UiState::default(),
            input: InputState::Idle,
            controls_region: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub fn images(&self) -> &[PlacedImage] {
        self.store.images()
    }

    #[must_use]
    pub fn image(&self, index: usize) -> Option<&PlacedImage> {
        self.store.get(index)
    }

    /// Number of placed images; mirrors the store length.
    #[must_use]
    pub fn live_image_count(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.ui.selected
    }

    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.ui.sidebar_open
    }

    #[must_use]
    pub fn input_state(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn pixel_width(&self) -> f64 {
        self.canvas.pixel_width()
    }

    #[must_use]
    pub fn pixel_height(&self) -> f64 {
        self.canvas.pixel_height()
    }

    /// Interaction state of one image.
    #[must_use]
    pub fn image_state(&self, index: usize) -> ImageState {
        match self.input {
            InputState::Dragging { index: i, .. } if i == index => ImageState::Dragging,
            InputState::Resizing { index: i, .. } if i == index => ImageState::Resizing,
            _ if self.ui.selected == Some(index) => ImageState::Selected,
            _ => ImageState::Idle,
        }
    }

    /// Box to draw for an image, including any uncommitted gesture preview.
    #[must_use]
    pub fn display_rect(&self, index: usize) -> Option<Rect> {
        let img = self.store.get(index)?;
        let mut rect = img.rect();
        match self.input {
            InputState::Dragging { index: i, x, y, .. } if i == index => {
                rect.x = x;
                rect.y = y;
            }
            InputState::Resizing { index: i, width, height, .. } if i == index => {
                rect.width = width;
                rect.height = height;
            }
            _ => {}
        }
        Some(rect)
    }

    /// Report the measured bounds of the floating controls popup. `None`
    /// falls back to the default geometry below the selected image.
    pub fn set_controls_region(&mut self, region: Option<Rect>) {
        self.controls_region = region;
    }

    /// Hit regions for the current layout, first match wins.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        let boxes: Vec<Rect> = (0..self.store.len()).filter_map(|i| self.display_rect(i)).collect();
        hit::build_regions(&boxes, self.ui.selected, self.controls_region)
    }

    // --- Canvas settings ---

    /// Replace the dimension inputs.
    ///
    /// # Errors
    ///
    /// Returns a validation error for NaN, infinite, or negative input.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Result<Vec<Action>, ValidationError> {
        self.canvas.set_dimensions(width, height)?;
        Ok(vec![Action::CanvasChanged, Action::RenderNeeded])
    }

    pub fn set_unit(&mut self, unit: Unit) -> Vec<Action> {
        self.canvas.unit = unit;
        vec![Action::CanvasChanged, Action::RenderNeeded]
    }

    /// # Errors
    ///
    /// Returns a validation error if `color` is not `#rgb` or `#rrggbb`.
    pub fn set_background_color(&mut self, color: &str) -> Result<Vec<Action>, ValidationError> {
        self.canvas.set_background_color(color)?;
        Ok(vec![Action::CanvasChanged, Action::RenderNeeded])
    }

    pub fn set_background_image(&mut self, image: Option<ImageSource>) -> Vec<Action> {
        self.canvas.background_image = image;
        vec![Action::CanvasChanged, Action::RenderNeeded]
    }

    pub fn set_sidebar_open(&mut self, open: bool) -> Vec<Action> {
        if self.ui.sidebar_open == open {
            return Vec::new();
        }
        self.ui.sidebar_open = open;
        vec![Action::RenderNeeded]
    }

    pub fn toggle_sidebar(&mut self) -> Vec<Action> {
        self.set_sidebar_open(!self.ui.sidebar_open)
    }

    // --- Ingestion ---

    /// Append one ingestion batch in a single step, subject to the ceiling.
    pub fn append_images(&mut self, entries: Vec<PlacedImage>) -> Vec<Action> {
        let start = self.store.len();
        let requested = entries.len();
        let count = self.store.append(entries).len();
        let mut actions = vec![Action::ImagesAppended { start, count, dropped: requested - count }];
        if count > 0 {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Append a single default-positioned entry for a preset.
    pub fn add_catalog_item(&mut self, item: &CatalogItem) -> Vec<Action> {
        self.append_images(vec![item.to_placed_image()])
    }

    // --- Direct image controls ---

    /// Select an image without starting a drag.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn select(&mut self, index: usize) -> Result<Vec<Action>, StoreError> {
        self.check_index(index)?;
        Ok(self.set_selection(Some(index)))
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        self.set_selection(None)
    }

    /// Advance an image's rotation by one quarter turn.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn rotate(&mut self, index: usize) -> Result<Vec<Action>, StoreError> {
        let rotation = self.store.rotate(index)?;
        let fields = PartialPlacedImage { rotation: Some(rotation), ..PartialPlacedImage::default() };
        Ok(vec![Action::ImageUpdated { index, fields }, Action::RenderNeeded])
    }

    /// Delete an image. Selection and any gesture follow their image: they
    /// clear when it was the deleted one and shift down when it sat above.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn delete(&mut self, index: usize) -> Result<Vec<Action>, StoreError> {
        self.store.remove(index)?;
        self.input = self.input.after_removal(index);
        let before = self.ui.selected;
        self.ui.selected = selection_after_removal(before, index);

        let mut actions = vec![Action::ImageDeleted { index }];
        if self.ui.selected != before {
            actions.push(Action::SelectionChanged(self.ui.selected));
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn set_shape(&mut self, index: usize, mask: ShapeMask) -> Result<Vec<Action>, StoreError> {
        self.update(index, PartialPlacedImage { mask: Some(mask), ..PartialPlacedImage::default() })
    }

    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn toggle_aspect_lock(&mut self, index: usize) -> Result<Vec<Action>, StoreError> {
        let locked = self.image(index).map(|img| img.aspect_locked);
        let Some(locked) = locked else {
            return Err(self.out_of_range(index));
        };
        self.update(index, PartialPlacedImage { aspect_locked: Some(!locked), ..PartialPlacedImage::default() })
    }

    /// Set one dimension from its slider, clamped into the slider range.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not live.
    pub fn set_slider_size(&mut self, index: usize, axis: SliderAxis, value: f64) -> Result<Vec<Action>, StoreError> {
        let value = if value.is_nan() { SLIDER_MIN_PX } else { value.clamp(SLIDER_MIN_PX, SLIDER_MAX_PX) };
        let fields = match axis {
            SliderAxis::Width => PartialPlacedImage { width: Some(value), ..PartialPlacedImage::default() },
            SliderAxis::Height => PartialPlacedImage { height: Some(value), ..PartialPlacedImage::default() },
        };
        self.update(index, fields)
    }

    // --- Pointer input ---

    /// Pointer pressed at `pt`.
    ///
    /// On an image body this selects the image and starts dragging it in one
    /// step. On a resize handle of the selected image it starts a resize. On
    /// the controls popup nothing changes. Anywhere else clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if a pending gesture points at a dead image.
    pub fn on_pointer_down(&mut self, pt: Point) -> Result<Vec<Action>, StoreError> {
        let mut actions = self.finish_gesture()?;
        let hit = hit::hit_test(pt, &self.regions());

        match hit {
            Some(hit) => match hit.part {
                HitPart::Body => {
                    actions.extend(self.set_selection(Some(hit.index)));
                    if let Some(img) = self.store.get(hit.index) {
                        self.input = InputState::Dragging { index: hit.index, last: pt, x: img.x, y: img.y };
                    }
                }
                HitPart::ResizeHandle(anchor) => actions.extend(self.begin_resize(anchor, pt)),
                HitPart::Controls => {}
            },
            None => actions.extend(self.set_selection(None)),
        }
        Ok(actions)
    }

    /// Pointer moved to `pt`. Updates the preview of an active gesture.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { index, last, x, y } => self.drag_move(index, last, x, y, pt),
            InputState::Resizing { .. } => self.resize_move(pt),
        }
    }

    /// Pointer released. Commits an active gesture to the store.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if the gesture points at a dead image.
    pub fn on_pointer_up(&mut self, _pt: Point) -> Result<Vec<Action>, StoreError> {
        self.finish_gesture()
    }

    /// Grab a resize handle of the selected image.
    ///
    /// Ignored when nothing is selected: handles exist only on the selected image.
    pub fn begin_resize(&mut self, anchor: ResizeAnchor, pt: Point) -> Vec<Action> {
        let Some(index) = self.ui.selected else {
            return Vec::new();
        };
        let Some(img) = self.store.get(index) else {
            return Vec::new();
        };
        self.input = InputState::Resizing {
            index,
            anchor,
            start: pt,
            orig_width: img.width,
            orig_height: img.height,
            width: img.width,
            height: img.height,
        };
        vec![Action::RenderNeeded]
    }

    fn drag_move(&mut self, index: usize, last: Point, x: f64, y: f64, pt: Point) -> Vec<Action> {
        let Some(img) = self.store.get(index) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        let max_x = self.canvas.pixel_width() - img.width;
        let max_y = self.canvas.pixel_height() - img.height;
        let nx = clamp_to_extent(x + (pt.x - last.x), max_x);
        let ny = clamp_to_extent(y + (pt.y - last.y), max_y);
        self.input = InputState::Dragging { index, last: pt, x: nx, y: ny };
        vec![Action::RenderNeeded]
    }

    fn resize_move(&mut self, pt: Point) -> Vec<Action> {
        let InputState::Resizing { index, anchor, start, orig_width, orig_height, .. } = self.input else {
            return Vec::new();
        };
        let Some(img) = self.store.get(index) else {
            self.input = InputState::Idle;
            return Vec::new();
        };

        let (sx, sy) = anchor.signs();
        let candidate_w = orig_width + sx * (pt.x - start.x);
        let candidate_h = orig_height + sy * (pt.y - start.y);
        let max_w = self.canvas.pixel_width() - img.x;
        let max_h = self.canvas.pixel_height() - img.y;

        let (width, height) = if img.aspect_locked && orig_width > 0.0 && orig_height > 0.0 {
            let scale = locked_scale(anchor, candidate_w / orig_width, candidate_h / orig_height);
            let fit = (max_w / orig_width).min(max_h / orig_height);
            let floor = (MIN_RESIZE_PX / orig_width).max(MIN_RESIZE_PX / orig_height);
            let s = scale.min(fit).max(floor);
            (orig_width * s, orig_height * s)
        } else {
            (candidate_w.min(max_w).max(MIN_RESIZE_PX), candidate_h.min(max_h).max(MIN_RESIZE_PX))
        };

        self.input = InputState::Resizing { index, anchor, start, orig_width, orig_height, width, height };
        vec![Action::RenderNeeded]
    }

    /// Commit and end the active gesture, if any.
    fn finish_gesture(&mut self) -> Result<Vec<Action>, StoreError> {
        let gesture = std::mem::take(&mut self.input);
        let (index, fields) = match gesture {
            InputState::Idle => return Ok(Vec::new()),
            InputState::Dragging { index, x, y, .. } => (index, PartialPlacedImage::position(x, y)),
            InputState::Resizing { index, width, height, .. } => (index, PartialPlacedImage::size(width, height)),
        };
        self.update(index, fields)
    }

    // --- Persistence ---

    /// Value snapshot of the current composition.
    #[must_use]
    pub fn snapshot(&self) -> TemplateRecord {
        codec::serialize(&self.canvas, self.store.images())
    }

    /// Replace the whole composition from a record. Selection and any
    /// gesture are cleared.
    pub fn hydrate(&mut self, record: TemplateRecord) -> Vec<Action> {
        let composition = codec::deserialize(record);
        let images = composition.images.len();
        self.canvas = composition.canvas;
        self.store.load_snapshot(composition.images);
        self.input = InputState::Idle;

        let mut actions = vec![Action::Hydrated { images, recorded_count: composition.live_count }];
        actions.extend(self.set_selection(None));
        actions.push(Action::CanvasChanged);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The committed scene, for raster export.
    #[must_use]
    pub fn render_region(&self) -> RenderRegion {
        RenderRegion::capture(&self.canvas, self.store.images())
    }

    // --- Internals ---

    fn update(&mut self, index: usize, fields: PartialPlacedImage) -> Result<Vec<Action>, StoreError> {
        self.store.update(index, &fields)?;
        Ok(vec![Action::ImageUpdated { index, fields }, Action::RenderNeeded])
    }

    fn set_selection(&mut self, selected: Option<usize>) -> Vec<Action> {
        if self.ui.selected == selected {
            return Vec::new();
        }
        self.ui.selected = selected;
        vec![Action::SelectionChanged(selected), Action::RenderNeeded]
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.store.len() { Ok(()) } else { Err(self.out_of_range(index)) }
    }

    fn out_of_range(&self, index: usize) -> StoreError {
        StoreError::IndexOutOfRange { index, len: self.store.len() }
    }
}

/// Common scale for an aspect-locked resize: edge handles follow their own
/// axis, corner handles follow whichever axis moved further.
fn locked_scale(anchor: ResizeAnchor, scale_w: f64, scale_h: f64) -> f64 {
    match anchor {
        ResizeAnchor::N | ResizeAnchor::S => scale_h,
        ResizeAnchor::E | ResizeAnchor::W => scale_w,
        ResizeAnchor::Ne | ResizeAnchor::Se | ResizeAnchor::Sw | ResizeAnchor::Nw => {
            if (scale_w - 1.0).abs() >= (scale_h - 1.0).abs() { scale_w } else { scale_h }
        }
    }
}
