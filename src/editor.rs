//! Editor session: the canvas core wired to its collaborators.
//!
//! DESIGN
//! ======
//! `EditorCore` is synchronous and owned by one caller. Work that waits on
//! I/O (file reads, proxy fetches) runs as a spawned task and reports back
//! over an unbounded channel; `pump` applies queued results on the caller's
//! side, one atomic append per ingestion batch. A task that finishes after
//! the session is dropped finds the channel closed and discards its result.
//!
//! Persistence calls are awaited directly: a load only hydrates the core
//! once the record is fully in hand.
//!
//! ERROR HANDLING
//! ==============
//! Every collaborator failure becomes exactly one `Notice` and leaves the
//! core untouched. `StoreError`s are caller bugs (a stale index) and are
//! logged at error level without a notice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvas::catalog;
use canvas::codec::{ExportError, ExportedImage, RasterExporter};
use canvas::doc::{ImageSource, PlacedImage, StoreError};
use canvas::engine::{Action, EditorCore};
use canvas::geom::Point;
use canvas::ingest::{self, IngestChannel, RawImage};
use canvas::input::SliderAxis;
use canvas::mask::ShapeMask;
use canvas::surface::ValidationError;
use canvas::units::Unit;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, EditorConfig};
use crate::error::ErrorCode;
use crate::fetch::{self, BatchFetchError, ImageFetcher, ProxyFetcher, sniff_mime};
use crate::notice::Notice;
use crate::persist::{HttpTemplateStore, LocalSlot, PersistError, TemplateStore};
use crate::raster::ImageRasterExporter;
use crate::session::SessionContext;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("unknown catalog item: {0}")]
    UnknownCatalogItem(String),

    #[error("cannot read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("{path} is not an image")]
    NotAnImage { path: String },
}

impl ErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCatalogItem(_) => "E_UNKNOWN_CATALOG_ITEM",
            Self::Unreadable { .. } => "E_FILE_UNREADABLE",
            Self::NotAnImage { .. } => "E_NOT_AN_IMAGE",
        }
    }
}

/// Completion of background work, applied by [`EditorSession::pump`].
#[derive(Debug)]
pub enum SessionEvent {
    /// Surviving entries of one batch, in input order.
    Ingested { channel: IngestChannel, entries: Vec<PlacedImage> },
    /// The batch could not run; nothing is added.
    BatchFailed { channel: IngestChannel, error: BatchFetchError },
    /// A background image file was read.
    BackgroundLoaded(ImageSource),
}

/// External services an editor session talks to.
pub struct Collaborators {
    pub templates: Arc<dyn TemplateStore>,
    pub slot: LocalSlot,
    /// `None` when no fetch proxy is configured.
    pub fetcher: Option<Arc<dyn ImageFetcher>>,
    pub exporter: Box<dyn RasterExporter + Send + Sync>,
}

impl Collaborators {
    /// Production collaborators for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        let fetcher: Option<Arc<dyn ImageFetcher>> = match &config.fetch_proxy_url {
            Some(url) => Some(Arc::new(ProxyFetcher::new(url.clone(), config.timeouts)?)),
            None => None,
        };
        Ok(Self {
            templates: Arc::new(HttpTemplateStore::from_config(config)?),
            slot: LocalSlot::new(config.slot_path.clone()),
            fetcher,
            exporter: Box::new(ImageRasterExporter::new(config.max_export_pixels)),
        })
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct EditorSession {
    core: EditorCore,
    context: SessionContext,
    collaborators: Collaborators,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    notices: Vec<Notice>,
}

impl EditorSession {
    #[must_use]
    pub fn new(config: &EditorConfig, context: SessionContext, collaborators: Collaborators) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        info!(
            max_images = config.max_images,
            authenticated = context.is_authenticated(),
            proxy = collaborators.fetcher.is_some(),
            "editor session started"
        );
        Self {
            core: EditorCore::with_capacity(config.max_images),
            context,
            collaborators,
            events_tx,
            events_rx,
            notices: Vec::new(),
        }
    }

    /// Session with production collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn from_config(config: &EditorConfig, context: SessionContext) -> Result<Self, ConfigError> {
        let collaborators = Collaborators::from_config(config)?;
        Ok(Self::new(config, context, collaborators))
    }

    #[must_use]
    pub fn core(&self) -> &EditorCore {
        &self.core
    }

    /// Direct access to the core for queries and edits with no session wrapper.
    pub fn core_mut(&mut self) -> &mut EditorCore {
        &mut self.core
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Ingestion ---

    /// Read local image files in order and queue them as one batch.
    /// Unreadable or non-image files are logged and skipped.
    pub fn ingest_files(&self, paths: Vec<PathBuf>) -> JoinHandle<()> {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let mut raw = Vec::with_capacity(paths.len());
            for path in paths {
                match read_image_file(&path).await {
                    Ok(image) => raw.push(image),
                    Err(e) => warn!(error = %e, "image file skipped"),
                }
            }
            let entries = ingest::entries_from_raw(raw);
            deliver(&tx, SessionEvent::Ingested { channel: IngestChannel::LocalFiles, entries });
        })
    }

    /// Fetch every URL in a comma or newline separated block through the
    /// proxy and queue the survivors as one batch.
    pub fn ingest_urls(&self, text: &str) -> JoinHandle<()> {
        let urls = ingest::parse_url_list(text);
        let fetcher = self.collaborators.fetcher.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            if urls.is_empty() {
                debug!("url list empty");
                return;
            }
            let Some(fetcher) = fetcher else {
                warn!(count = urls.len(), "url ingestion without a fetch proxy");
                let error = BatchFetchError::ProxyUnavailable;
                deliver(&tx, SessionEvent::BatchFailed { channel: IngestChannel::UrlList, error });
                return;
            };

            let requested = urls.len();
            match fetch::fetch_all(fetcher, urls).await {
                Ok(results) => {
                    for failure in results.iter().filter_map(|r| r.as_ref().err()) {
                        warn!(error = %failure, retryable = failure.retryable(), "image url dropped");
                    }
                    let entries = ingest::entries_from_raw(ingest::surviving(results));
                    debug!(requested, fetched = entries.len(), "url batch fetched");
                    deliver(&tx, SessionEvent::Ingested { channel: IngestChannel::UrlList, entries });
                }
                Err(error) => {
                    warn!(%error, requested, "url batch failed");
                    deliver(&tx, SessionEvent::BatchFailed { channel: IngestChannel::UrlList, error });
                }
            }
        })
    }

    /// Read an image file and queue it as the canvas background.
    pub fn ingest_background_file(&self, path: PathBuf) -> JoinHandle<()> {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match read_image_file(&path).await {
                Ok(image) => deliver(&tx, SessionEvent::BackgroundLoaded(image.into_source())),
                Err(e) => warn!(error = %e, "background file skipped"),
            }
        })
    }

    /// Append one catalog preset.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCatalogItem` if `id` is not in the catalog.
    pub fn pick_catalog(&mut self, id: &str) -> Result<Vec<Action>, IngestError> {
        let item = catalog::find(id).ok_or_else(|| IngestError::UnknownCatalogItem(id.to_owned()))?;
        Ok(self.core.add_catalog_item(item))
    }

    /// Apply every queued background completion.
    pub fn pump(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            actions.extend(self.apply_event(event));
        }
        actions
    }

    fn apply_event(&mut self, event: SessionEvent) -> Vec<Action> {
        match event {
            SessionEvent::Ingested { channel, entries } => {
                if entries.is_empty() {
                    debug!(?channel, "batch produced no entries");
                    return Vec::new();
                }
                let actions = self.core.append_images(entries);
                if let Some(Action::ImagesAppended { count, dropped, .. }) = actions.first() {
                    if *dropped > 0 {
                        debug!(?channel, count, dropped, "batch truncated at capacity");
                    }
                }
                actions
            }
            SessionEvent::BatchFailed { channel, error } => {
                debug!(?channel, %error, "batch failure surfaced");
                self.notices.push(Notice::failure("Failed to load images", &error));
                Vec::new()
            }
            SessionEvent::BackgroundLoaded(source) => self.core.set_background_image(Some(source)),
        }
    }

    // --- Direct controls ---

    pub fn select(&mut self, index: usize) -> Vec<Action> {
        checked("select", self.core.select(index))
    }

    pub fn rotate(&mut self, index: usize) -> Vec<Action> {
        checked("rotate", self.core.rotate(index))
    }

    pub fn delete(&mut self, index: usize) -> Vec<Action> {
        checked("delete", self.core.delete(index))
    }

    pub fn set_shape(&mut self, index: usize, mask: ShapeMask) -> Vec<Action> {
        checked("set_shape", self.core.set_shape(index, mask))
    }

    pub fn toggle_aspect_lock(&mut self, index: usize) -> Vec<Action> {
        checked("toggle_aspect_lock", self.core.toggle_aspect_lock(index))
    }

    pub fn set_slider_size(&mut self, index: usize, axis: SliderAxis, value: f64) -> Vec<Action> {
        checked("set_slider_size", self.core.set_slider_size(index, axis, value))
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, pt: Point) -> Vec<Action> {
        checked("pointer_down", self.core.on_pointer_down(pt))
    }

    pub fn pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pt)
    }

    pub fn pointer_up(&mut self, pt: Point) -> Vec<Action> {
        checked("pointer_up", self.core.on_pointer_up(pt))
    }

    // --- Canvas settings ---

    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Vec<Action> {
        let result = self.core.set_dimensions(width, height);
        self.validated("Invalid canvas size", result)
    }

    pub fn set_background_color(&mut self, color: &str) -> Vec<Action> {
        let result = self.core.set_background_color(color);
        self.validated("Invalid background color", result)
    }

    pub fn set_unit(&mut self, unit: Unit) -> Vec<Action> {
        if !unit.is_recognized() {
            warn!(unit = %unit, "unrecognized unit converts at scale 1");
        }
        self.core.set_unit(unit)
    }

    pub fn set_background_image(&mut self, image: Option<ImageSource>) -> Vec<Action> {
        self.core.set_background_image(image)
    }

    fn validated(&mut self, message: &str, result: Result<Vec<Action>, ValidationError>) -> Vec<Action> {
        result.unwrap_or_else(|e| {
            warn!(error = %e, "canvas edit rejected");
            self.notices.push(Notice::failure(message, &e));
            Vec::new()
        })
    }

    // --- Persistence ---

    /// Persist the current composition to the backend or the local slot.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure after queueing its notice.
    pub async fn save(&mut self) -> Result<(), PersistError> {
        let record = self.core.snapshot();
        let result = if self.context.is_authenticated() {
            match self.context.template_id.clone() {
                Some(id) => self.collaborators.templates.update(&self.context, &id, &record).await,
                None => self.collaborators.templates.create(&self.context, &record).await.map(|stored| {
                    self.context.template_id = Some(stored.id);
                }),
            }
        } else {
            self.collaborators.slot.write(&record).await
        };

        match result {
            Ok(()) => {
                info!(images = record.images.len(), template_id = ?self.context.template_id, "template saved");
                self.notices.push(Notice::info("Template saved!"));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, retryable = e.retryable(), "template save failed");
                self.notices.push(Notice::failure("Failed to save template", &e));
                Err(e)
            }
        }
    }

    /// Resume the session's record, if there is one. Returns the hydration
    /// actions, or nothing when there was no record to load.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure after queueing its notice; the core
    /// is left as it was.
    pub async fn load(&mut self) -> Result<Vec<Action>, PersistError> {
        let fetched = if self.context.is_authenticated() {
            self.collaborators.templates.current(&self.context).await.map(|stored| {
                stored.map(|stored| {
                    self.context.template_id = Some(stored.id);
                    stored.record
                })
            })
        } else if self.context.load_saved {
            self.collaborators.slot.read().await
        } else {
            Ok(None)
        };

        let record = match fetched {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("no saved template");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, retryable = e.retryable(), "template load failed");
                self.notices.push(Notice::failure("Failed to load template", &e));
                return Err(e);
            }
        };

        let actions = self.core.hydrate(record);
        if let Some(Action::Hydrated { images, recorded_count }) = actions.first() {
            if images != recorded_count {
                warn!(images, recorded_count, "saved image count disagrees with image list");
            }
            info!(images, template_id = ?self.context.template_id, "template loaded");
        }
        Ok(actions)
    }

    /// Delete a backend record. Forgets the session's id if it was this one.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure after queueing its notice.
    pub async fn delete_remote(&mut self, id: &str) -> Result<(), PersistError> {
        match self.collaborators.templates.delete(&self.context, id).await {
            Ok(()) => {
                if self.context.template_id.as_deref() == Some(id) {
                    self.context.template_id = None;
                }
                info!(%id, "template deleted");
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "template delete failed");
                self.notices.push(Notice::failure("Failed to delete template", &e));
                Err(e)
            }
        }
    }

    // --- Export ---

    /// Flatten the committed canvas into a downloadable image.
    ///
    /// # Errors
    ///
    /// Returns the exporter failure after queueing its notice.
    pub fn export_raster(&mut self) -> Result<ExportedImage, ExportError> {
        let region = self.core.render_region();
        self.collaborators.exporter.export(&region).inspect_err(|e| {
            warn!(error = %e, "raster export failed");
            self.notices.push(Notice::failure("Failed to export template", e));
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn checked(op: &'static str, result: Result<Vec<Action>, StoreError>) -> Vec<Action> {
    result.unwrap_or_else(|e| {
        error!(op, error = %e, code = e.error_code(), "image operation on stale index");
        Vec::new()
    })
}

fn deliver(tx: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    if tx.send(event).is_err() {
        debug!("editor session closed; late result dropped");
    }
}

async fn read_image_file(path: &Path) -> Result<RawImage, IngestError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IngestError::Unreadable { path: display.clone(), message: e.to_string() })?;
    let Some(mime) = sniff_mime(&bytes) else {
        return Err(IngestError::NotAnImage { path: display });
    };
    Ok(RawImage::new(mime, bytes))
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
