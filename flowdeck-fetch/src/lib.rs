// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Flowdeck Fetch
//!
//! Retry-aware HTTP access to remote workflow instances.
//!
//! This crate provides the outbound half of Flowdeck:
//!
//! - [`retry`] - A reliability primitive that retries transport-level
//!   failures with exponential backoff. It knows nothing about API
//!   semantics; HTTP error statuses pass through untouched.
//! - [`client`] - The workflow API client. Builds requests against an
//!   instance's base URL, maps HTTP statuses to typed errors, and unwraps
//!   the `{"data": [...]}` envelope.
//! - [`probe`] - Connectivity checks that reuse the client to validate a
//!   profile's reachability and credential.
//!
//! ## Example
//!
//! ```ignore
//! use flowdeck_fetch::{WorkflowApi, WorkflowClient};
//!
//! let client = WorkflowClient::new()?;
//! let records = client
//!     .list_workflows("https://flows.example.com", "api-key", None)
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod probe;
pub mod retry;

// Re-export key types at crate root
pub use client::{WorkflowApi, WorkflowClient, API_KEY_HEADER, WORKFLOW_LIMIT_CEILING};
pub use error::ApiError;
pub use probe::{probe_instance, ProbeReport};
pub use retry::{retry_transient, RetryPolicy, Transient};
