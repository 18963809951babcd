//! Persistence collaborators: the template backend and the local slot.
//!
//! DESIGN
//! ======
//! The backend stores one `TemplateRecord` per document, addressed by an
//! opaque `_id`, behind bearer-token auth. The local slot holds a single
//! record for sessions without a token. Both speak the same record type, so
//! the editor session picks one per call based on its `SessionContext`.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is a `PersistError`. The session converts it to one notice
//! and never touches the store before a load has fully succeeded.

pub mod api;
pub mod slot;

use canvas::codec::TemplateRecord;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, retryable_status};
use crate::session::SessionContext;

pub use api::HttpTemplateStore;
pub use slot::LocalSlot;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    /// The session has no bearer token.
    #[error("not signed in")]
    Unauthenticated,

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend returned a non-success status.
    #[error("backend responded with status {status}")]
    Status { status: u16, body: String },

    /// The backend response was not a template document.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// Reading or writing the local slot failed.
    #[error("local slot I/O failed: {0}")]
    Slot(String),

    /// The local slot holds something other than a template record.
    #[error("local slot is corrupt: {0}")]
    Corrupt(String),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Request(_) => "E_PERSIST_REQUEST",
            Self::Status { .. } => "E_PERSIST_STATUS",
            Self::Parse(_) => "E_PERSIST_PARSE",
            Self::Slot(_) => "E_SLOT_IO",
            Self::Corrupt(_) => "E_SLOT_CORRUPT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::Slot(_) => true,
            Self::Status { status, .. } => retryable_status(*status),
            Self::Unauthenticated | Self::Parse(_) | Self::Corrupt(_) => false,
        }
    }
}

/// A record as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTemplate {
    #[serde(rename = "_id")]
    pub id: String,
    /// Backend timestamp of the last write, passed through untouched.
    #[serde(rename = "lastEdited", default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<String>,
    #[serde(flatten)]
    pub record: TemplateRecord,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Backend operations the editor needs.
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// The record this session should resume, if any.
    async fn current(&self, session: &SessionContext) -> Result<Option<StoredTemplate>, PersistError>;

    /// Store a new record; returns it with its assigned id.
    async fn create(&self, session: &SessionContext, record: &TemplateRecord) -> Result<StoredTemplate, PersistError>;

    /// Replace the record stored under `id`.
    async fn update(&self, session: &SessionContext, id: &str, record: &TemplateRecord) -> Result<(), PersistError>;

    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), PersistError>;
}
