//! Local durable slot: one serialized record in one file.
//!
//! Writes go to a sibling temp file that is then renamed over the slot, so a
//! crash mid-save leaves the previous record intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use canvas::codec::TemplateRecord;
use tracing::{debug, info};

use super::PersistError;

#[derive(Debug, Clone)]
pub struct LocalSlot {
    path: PathBuf,
}

impl LocalSlot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored record. An absent slot is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Slot` on I/O failure and `Corrupt` if the contents do not parse.
    pub async fn read(&self) -> Result<Option<TemplateRecord>, PersistError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "local slot empty");
                return Ok(None);
            }
            Err(e) => return Err(PersistError::Slot(e.to_string())),
        };
        TemplateRecord::from_json(&raw).map(Some).map_err(|e| PersistError::Corrupt(e.to_string()))
    }

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `Slot` if the file cannot be written.
    pub async fn write(&self, record: &TemplateRecord) -> Result<(), PersistError> {
        let json = record.to_json().map_err(|e| PersistError::Slot(e.to_string()))?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(|e| PersistError::Slot(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| PersistError::Slot(e.to_string()))?;
        info!(path = %self.path.display(), images = record.images.len(), "local slot written");
        Ok(())
    }

    /// Empty the slot. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Slot` if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), PersistError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Slot(e.to_string())),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[path = "slot_test.rs"]
mod tests;
