//! Decor template editor session.
//!
//! Embeds the [`canvas`] editor core and connects it to the services a
//! running editor needs: a template backend, a local durable slot, an image
//! fetch proxy, and a raster exporter. All I/O happens here; the core only
//! ever sees finished values.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | [`editor::EditorSession`], ingestion tasks, save/load/export |
//! | [`config`] | [`config::EditorConfig`] from environment variables |
//! | [`session`] | Injected bearer token, template id, and load flag |
//! | [`persist`] | Backend client and local slot |
//! | [`fetch`] | Proxy image fetcher and ordered batch fetch |
//! | [`raster`] | PNG export with the `image` crate |
//! | [`notice`] | User-visible notices |
//! | [`error`] | Error codes and retry classification |
//! | [`telemetry`] | Tracing subscriber setup |

pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod notice;
pub mod persist;
pub mod raster;
pub mod session;
pub mod telemetry;

pub use canvas;
pub use config::EditorConfig;
pub use editor::{Collaborators, EditorSession};
pub use notice::Notice;
pub use session::SessionContext;
