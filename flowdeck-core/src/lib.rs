// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Flowdeck Core
//!
//! Core types, models, and validation for the Flowdeck workspace.
//!
//! This crate provides the foundational abstractions used across all other
//! Flowdeck crates, including:
//!
//! - Domain models (instance profiles, workflow records, cache entries)
//! - Origin normalization for instance base URLs
//! - Error types
//!
//! ## Key Types
//!
//! ### Instance Types
//! - [`InstanceProfile`] - A configured remote endpoint + credential pair
//! - [`InstanceDraft`] - Validated input for creating/updating a profile
//! - [`RegistryDocument`] - The persisted set of profiles plus selection
//!
//! ### Workflow Types
//! - [`WorkflowRecord`] - One workflow as returned by the remote API,
//!   passed through verbatim
//! - [`WorkflowEnvelope`] - The `{"data": [...]}` API response envelope
//!
//! ### Cache Types
//! - [`CacheEntry`] - Cached workflow collection with fetch timestamp and ttl

pub mod error;
pub mod models;
pub mod origin;

// Re-export error types
pub use error::{CoreError, ShapeError};

// Re-export all model types
pub use models::{
    // Instance types
    InstanceDraft,
    InstanceProfile,
    RegistryDocument,
    MAX_NAME_LEN,
    MIN_API_KEY_LEN,
    REGISTRY_SCHEMA_VERSION,
    // Workflow types
    WorkflowEnvelope,
    WorkflowRecord,
    // Cache types
    CacheEntry,
    DEFAULT_CACHE_TTL_MS,
};

// Re-export origin helpers
pub use origin::normalize_origin;
