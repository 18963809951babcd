//! HTTP client for the template backend.
//!
//! `GET /templates` lists the caller's records, `GET /templates/{id}` fetches
//! one, `POST /templates` creates, `PUT` and `DELETE /templates/{id}` replace
//! and remove. Every call sends `Authorization: Bearer <token>`.

use canvas::codec::TemplateRecord;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{PersistError, StoredTemplate, TemplateStore};
use crate::config::{ConfigError, EditorConfig};
use crate::session::SessionContext;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpTemplateStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTemplateStore {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_client(config.timeouts.client()?, &config.api_base_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned() }
    }

    fn collection_url(&self) -> String {
        format!("{}/templates", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/templates/{id}", self.base_url)
    }
}

fn authorized(
    builder: reqwest::RequestBuilder,
    session: &SessionContext,
) -> Result<reqwest::RequestBuilder, PersistError> {
    let token = session.bearer_token.as_deref().ok_or(PersistError::Unauthenticated)?;
    Ok(builder.bearer_auth(token))
}

async fn send(builder: reqwest::RequestBuilder) -> Result<(u16, String), PersistError> {
    let response = builder.send().await.map_err(|e| PersistError::Request(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| PersistError::Request(e.to_string()))?;
    Ok((status, body))
}

fn expect_success(status: u16, body: String) -> Result<String, PersistError> {
    if (200..300).contains(&status) { Ok(body) } else { Err(PersistError::Status { status, body }) }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, PersistError> {
    serde_json::from_str(body).map_err(|e| PersistError::Parse(e.to_string()))
}

/// Most recently edited record; the later entry wins a tie.
fn most_recent(templates: Vec<StoredTemplate>) -> Option<StoredTemplate> {
    templates.into_iter().max_by(|a, b| a.last_edited.cmp(&b.last_edited))
}

#[async_trait::async_trait]
impl TemplateStore for HttpTemplateStore {
    async fn current(&self, session: &SessionContext) -> Result<Option<StoredTemplate>, PersistError> {
        if let Some(id) = session.template_id.as_deref() {
            let request = authorized(self.http.get(self.item_url(id)), session)?;
            let (status, body) = send(request).await?;
            if status == 404 {
                debug!(%id, "template not found");
                return Ok(None);
            }
            return parse(&expect_success(status, body)?).map(Some);
        }

        let request = authorized(self.http.get(self.collection_url()), session)?;
        let (status, body) = send(request).await?;
        let templates: Vec<StoredTemplate> = parse(&expect_success(status, body)?)?;
        debug!(count = templates.len(), "listed templates");
        Ok(most_recent(templates))
    }

    async fn create(&self, session: &SessionContext, record: &TemplateRecord) -> Result<StoredTemplate, PersistError> {
        let request = authorized(self.http.post(self.collection_url()).json(record), session)?;
        let (status, body) = send(request).await?;
        let stored: StoredTemplate = parse(&expect_success(status, body)?)?;
        info!(id = %stored.id, "template created");
        Ok(stored)
    }

    async fn update(&self, session: &SessionContext, id: &str, record: &TemplateRecord) -> Result<(), PersistError> {
        let request = authorized(self.http.put(self.item_url(id)).json(record), session)?;
        let (status, body) = send(request).await?;
        expect_success(status, body)?;
        info!(%id, "template updated");
        Ok(())
    }

    async fn delete(&self, session: &SessionContext, id: &str) -> Result<(), PersistError> {
        let request = authorized(self.http.delete(self.item_url(id)), session)?;
        let (status, body) = send(request).await?;
        expect_success(status, body)?;
        info!(%id, "template deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
