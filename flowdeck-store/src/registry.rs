//! Instance registry.
//!
//! Maps instance ids to connection profiles. The registry owns no
//! long-lived in-memory state: every operation re-reads the durable
//! document, so external writers (another process, a sync'd copy) are
//! picked up without coordination.

use chrono::Utc;
use flowdeck_core::{
    normalize_origin, InstanceDraft, InstanceProfile, RegistryDocument, MAX_NAME_LEN,
    MIN_API_KEY_LEN,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::kv::KeyValueTier;

/// Durable-tier key under which the registry document lives.
pub const REGISTRY_KEY: &str = "instanceRegistry";

/// Registry of configured workflow instances.
pub struct InstanceRegistry {
    store: Arc<dyn KeyValueTier>,
}

impl InstanceRegistry {
    /// Creates a registry over the given durable tier.
    pub fn new(store: Arc<dyn KeyValueTier>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Document Access
    // ========================================================================

    /// Reads the current document; missing data yields an empty document.
    async fn read_document(&self) -> Result<RegistryDocument, StoreError> {
        match self.store.get(REGISTRY_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(RegistryDocument::default()),
        }
    }

    /// Persists the full document.
    async fn write_document(&self, document: &RegistryDocument) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(document)?;
        self.store.set(REGISTRY_KEY, value).await
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Returns all profiles keyed by id. Empty map when nothing is stored.
    pub async fn list_all(&self) -> Result<HashMap<String, InstanceProfile>, StoreError> {
        Ok(self.read_document().await?.instances)
    }

    /// Looks up a profile by id. Blank or unknown ids yield `None`.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<InstanceProfile>, StoreError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.read_document().await?.instances.remove(id))
    }

    /// Looks up the profile matching a URL's origin.
    ///
    /// The input is reduced to origin form, so any page URL within an
    /// instance matches its profile. When several profiles share an
    /// origin, the most recently used one wins (ties broken by id for
    /// determinism). Unparseable input yields `None`, not an error.
    pub async fn get_by_origin(
        &self,
        origin_url: &str,
    ) -> Result<Option<InstanceProfile>, StoreError> {
        let Ok(origin) = normalize_origin(origin_url) else {
            return Ok(None);
        };

        let document = self.read_document().await?;
        let best = document
            .instances
            .into_values()
            .filter(|p| p.base_url == origin)
            .max_by(|a, b| {
                a.last_used_at
                    .cmp(&b.last_used_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
        Ok(best)
    }

    /// Returns the currently selected instance id, if any.
    pub async fn selected_instance_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_document().await?.selected_instance_id)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Validates and persists a profile draft, returning its id.
    ///
    /// A draft without an id creates a new profile; a draft with an id
    /// updates in place, preserving the original creation timestamp. The
    /// URL is reduced to origin form and the last-used timestamp is
    /// refreshed either way.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] when the name is too long, the URL does
    /// not parse, or the API key is too short.
    pub async fn save(&self, draft: InstanceDraft) -> Result<String, StoreError> {
        let base_url = normalize_origin(&draft.url)
            .map_err(|e| StoreError::Validation(format!("Instance URL is invalid: {e}")))?;

        if draft.api_key.trim().len() < MIN_API_KEY_LEN {
            return Err(StoreError::Validation(format!(
                "API key must be at least {MIN_API_KEY_LEN} characters"
            )));
        }

        let mut document = self.read_document().await?;

        let name = match draft.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if name.chars().count() > MAX_NAME_LEN {
                    return Err(StoreError::Validation(format!(
                        "Instance name must be at most {MAX_NAME_LEN} characters"
                    )));
                }
                name.to_string()
            }
            _ => format!("Instance {}", document.instances.len() + 1),
        };

        let now = Utc::now();
        let id = draft.id.unwrap_or_else(InstanceProfile::new_id);
        let created_at = document
            .instances
            .get(&id)
            .map_or(now, |existing| existing.created_at);

        let profile = InstanceProfile {
            id: id.clone(),
            name,
            base_url,
            api_key: draft.api_key,
            created_at,
            last_used_at: now,
        };

        document.instances.insert(id.clone(), profile);
        self.write_document(&document).await?;

        info!(id = %id, "Instance profile saved");
        Ok(id)
    }

    /// Removes a profile. Unknown ids are a no-op.
    ///
    /// The caller is responsible for invalidating any cache entry held
    /// for this id (the service layer pairs the two).
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut document = self.read_document().await?;
        if document.instances.remove(id).is_none() {
            debug!(id = %id, "Delete of unknown instance ignored");
            return Ok(());
        }
        if document.selected_instance_id.as_deref() == Some(id) {
            document.selected_instance_id = None;
        }
        self.write_document(&document).await?;

        info!(id = %id, "Instance profile deleted");
        Ok(())
    }

    /// Selects an instance, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] when the id is unknown.
    pub async fn set_selected(&self, id: Option<String>) -> Result<(), StoreError> {
        let mut document = self.read_document().await?;
        if let Some(id) = &id {
            if !document.instances.contains_key(id) {
                return Err(StoreError::Validation(format!("Unknown instance id: {id}")));
            }
        }
        document.selected_instance_id = id;
        self.write_document(&document).await
    }

    /// Refreshes a profile's last-used timestamp. Unknown ids are a no-op.
    pub async fn touch(&self, id: &str) -> Result<(), StoreError> {
        let mut document = self.read_document().await?;
        let Some(profile) = document.instances.get_mut(id) else {
            return Ok(());
        };
        profile.touch();
        self.write_document(&document).await
    }
}

// ============================================================================
// Tests
// ============================================================================
