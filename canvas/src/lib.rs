//! Template canvas editor core.
//!
//! This crate owns the editing model for a decor template: a rectangular
//! canvas sized from user units, an ordered set of placed images, and the
//! gesture state machine that turns raw pointer input into bounded position
//! and size mutations. It performs no I/O. The host session is responsible
//! for reading files, fetching remote images, persisting records, and
//! feeding the resulting entries and snapshots back in through
//! [`engine::EditorCore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EditorCore`] and the [`engine::Action`]s it reports |
//! | [`doc`] | Placed-image types and the capacity-bounded [`doc::ImageStore`] |
//! | [`surface`] | Canvas settings (dimensions, unit, background) |
//! | [`units`] | User-unit to pixel conversion |
//! | [`mask`] | Shape-mask clip geometry |
//! | [`geom`] | Points and rectangles in canvas-local pixels |
//! | [`input`] | Gesture state machine types and per-image state |
//! | [`hit`] | Hit regions for handles, controls, and image bodies |
//! | [`ingest`] | Normalizing raw sources into placed images |
//! | [`catalog`] | Preset stickers and frames |
//! | [`codec`] | `TemplateRecord` snapshots and the raster-export seam |
//! | [`consts`] | Shared numeric constants (slider limits, handle sizes, etc.) |

pub mod catalog;
pub mod codec;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod ingest;
pub mod input;
pub mod mask;
pub mod surface;
pub mod units;
