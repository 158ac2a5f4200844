//! Domain models for Flowdeck.
//!
//! This module contains the core data structures for instance profiles,
//! workflow records, and cached workflow collections.
//!
//! ## Submodules
//!
//! - [`instance`] - Instance types (InstanceProfile, InstanceDraft, RegistryDocument)
//! - [`workflow`] - Workflow types (WorkflowRecord, WorkflowEnvelope)
//! - [`cache`] - Cache types (CacheEntry)

mod cache;
mod instance;
mod workflow;

// Re-export everything at the models level
pub use cache::{CacheEntry, DEFAULT_CACHE_TTL_MS};
pub use instance::{
    InstanceDraft, InstanceProfile, RegistryDocument, MAX_NAME_LEN, MIN_API_KEY_LEN,
    REGISTRY_SCHEMA_VERSION,
};
pub use workflow::{WorkflowEnvelope, WorkflowRecord};
