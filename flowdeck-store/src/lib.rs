// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Flowdeck Store
//!
//! Instance registry and per-instance workflow cache.
//!
//! This crate provides:
//!
//! - **`InstanceRegistry`**: configured instances, persisted in the
//!   durable key-value tier and re-read on every operation
//! - **`WorkflowCache`**: in-memory workflow collections with a
//!   write-through mirror in the volatile tier
//! - **`kv`**: the two key-value tiers ([`FileTier`], [`MemoryTier`])
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use flowdeck_store::{
//!     default_mirror_path, default_registry_path, FileTier, InstanceRegistry, WorkflowCache,
//! };
//!
//! let registry = InstanceRegistry::new(Arc::new(FileTier::new(default_registry_path())));
//! let cache = WorkflowCache::new(Arc::new(FileTier::new(default_mirror_path())));
//!
//! // Once, at process start.
//! let restored = cache.restore_from_mirror().await;
//! ```

pub mod cache;
pub mod error;
pub mod kv;
pub mod registry;

pub use cache::{WorkflowCache, MIRROR_KEY};
pub use error::StoreError;
pub use kv::{
    default_cache_dir, default_config_dir, default_mirror_path, default_registry_path, FileTier,
    KeyValueTier, MemoryTier,
};
pub use registry::{InstanceRegistry, REGISTRY_KEY};
