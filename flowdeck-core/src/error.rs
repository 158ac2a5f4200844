//! Core error types for Flowdeck.

use thiserror::Error;

/// Core error type for Flowdeck operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A base URL could not be parsed or reduced to an origin.
    #[error("Invalid instance URL: {0}")]
    InvalidUrl(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error produced when persisted data does not match the expected shape.
///
/// Raised at the volatile-store boundary when a mirrored cache entry fails
/// the typed parse. Entries that produce this error are discarded, never
/// propagated to callers.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The value could not be deserialized into the expected type.
    #[error("Malformed entry: {0}")]
    Malformed(#[from] serde_json::Error),
}
