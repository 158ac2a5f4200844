//! Store error types.

use thiserror::Error;

/// Errors that can occur in the registry and cache stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Profile input failed validation. Carries a human-readable reason.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// IO error from the backing tier.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error from the backing tier.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
