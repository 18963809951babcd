//! Session context injected into the editor.
//!
//! Holds what the web app kept in ambient storage: the bearer token, the id
//! of the template being edited, and whether the local slot should be read on
//! load. An editor never reads these from anywhere else.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Backend bearer token. `None` selects the local durable slot.
    pub bearer_token: Option<String>,
    /// Backend id of the template being edited, once known.
    pub template_id: Option<String>,
    /// Hydrate from the local slot on load.
    pub load_saved: bool,
}

impl SessionContext {
    /// Session backed by the persistence service.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self { bearer_token: Some(token.into()), ..Self::default() }
    }

    /// Session backed by the local slot only.
    #[must_use]
    pub fn local(load_saved: bool) -> Self {
        Self { load_saved, ..Self::default() }
    }

    #[must_use]
    pub fn with_template_id(mut self, id: impl Into<String>) -> Self {
        self.template_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}
