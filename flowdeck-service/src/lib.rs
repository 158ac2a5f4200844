// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Flowdeck Service
//!
//! The public entry point of the caching/fetch engine.
//!
//! [`WorkflowService`] ties the instance registry, the per-instance cache,
//! and the workflow API client together:
//!
//! - `fetch_workflows` serves from cache while fresh and hits the network
//!   on miss or forced refresh
//! - `refresh_workflows` is invalidation followed by the normal fetch
//!   path, so the two can never diverge
//! - `test_connection` validates a profile's reachability and credential
//!
//! UI collaborators talk to the service through [`dispatch::Request`], a
//! tagged request type dispatched through one exhaustive match.
//!
//! Concurrent callers missing the cache for the same instance may each
//! issue a remote fetch; collection reads are idempotent on the remote, so
//! the last completed write wins and no single-flight dedup is attempted.

pub mod dispatch;
pub mod error;
pub mod service;

pub use dispatch::{Envelope, Request};
pub use error::ServiceError;
pub use service::{FetchOutcome, ProbeOutcome, WorkflowService};
