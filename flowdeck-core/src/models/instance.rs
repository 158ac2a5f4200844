//! Instance-related types.
//!
//! An instance is one configured remote endpoint + credential pair. The
//! full set of instances, together with the currently selected one, forms
//! the [`RegistryDocument`] persisted in the durable store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum length of an instance display name.
pub const MAX_NAME_LEN: usize = 100;

/// Minimum length of an instance API key.
pub const MIN_API_KEY_LEN: usize = 10;

/// Schema version of the persisted registry document.
pub const REGISTRY_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Instance Profile
// ============================================================================

/// A configured workflow instance: base URL plus credential.
///
/// The id is opaque, assigned at creation, and never changes. The base URL
/// is always stored in normalized origin form (scheme + host + port, no
/// path or query).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceProfile {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,

    /// Display name, at most [`MAX_NAME_LEN`] characters.
    pub name: String,

    /// Base URL in normalized origin form.
    pub base_url: String,

    /// API credential. Opaque, never logged.
    pub api_key: String,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last read or written.
    pub last_used_at: DateTime<Utc>,
}

impl InstanceProfile {
    /// Generates a fresh opaque profile id.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Refreshes the last-used timestamp.
    pub fn touch(&mut self) {
        self.last_used_at = Utc::now();
    }
}

// The credential must never appear in logs or debug output.
impl fmt::Debug for InstanceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("last_used_at", &self.last_used_at)
            .finish()
    }
}

// ============================================================================
// Instance Draft
// ============================================================================

/// Caller-supplied input for creating or updating an instance profile.
///
/// A missing `id` means "create"; a present `id` preserves the existing
/// profile's identity and creation timestamp. A blank `name` is
/// auto-generated by the registry.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceDraft {
    /// Existing profile id, if updating.
    pub id: Option<String>,

    /// Display name. Auto-generated when blank.
    pub name: Option<String>,

    /// Instance URL; reduced to origin form on save.
    pub url: String,

    /// API credential, at least [`MIN_API_KEY_LEN`] characters.
    pub api_key: String,
}

// The credential must never appear in logs or debug output.
impl fmt::Debug for InstanceDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceDraft")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Registry Document
// ============================================================================

/// The persisted registry: all profiles plus the current selection.
///
/// This is the unit stored in the durable tier. The registry re-reads it
/// on every operation rather than keeping a long-lived in-memory copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryDocument {
    /// Schema version of this document.
    pub version: u32,

    /// All configured profiles, keyed by id.
    pub instances: HashMap<String, InstanceProfile>,

    /// Id of the currently selected instance, if any.
    pub selected_instance_id: Option<String>,
}

impl Default for RegistryDocument {
    fn default() -> Self {
        Self {
            version: REGISTRY_SCHEMA_VERSION,
            instances: HashMap::new(),
            selected_instance_id: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> InstanceProfile {
        InstanceProfile {
            id: InstanceProfile::new_id(),
            name: "Production".to_string(),
            base_url: "https://flows.example.com".to_string(),
            api_key: "abcdefghij".to_string(),
            created_at: Utc::now(),
            last_used_at: Utc::now(),
        }
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(InstanceProfile::new_id(), InstanceProfile::new_id());
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", profile());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("abcdefghij"));

        let draft = InstanceDraft {
            api_key: "abcdefghij".to_string(),
            ..InstanceDraft::default()
        };
        let rendered = format!("{draft:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("abcdefghij"));
    }

    #[test]
    fn profile_round_trips_camel_case() {
        let p = profile();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("baseUrl").is_some());
        assert!(json.get("lastUsedAt").is_some());

        let back: InstanceProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn default_document_is_empty_at_current_version() {
        let doc = RegistryDocument::default();
        assert_eq!(doc.version, REGISTRY_SCHEMA_VERSION);
        assert!(doc.instances.is_empty());
        assert!(doc.selected_instance_id.is_none());
    }
}
