//! Fetch error types.

use thiserror::Error;

/// Error type for remote workflow API operations.
///
/// Only [`ApiError::Network`] is ever produced by the retry loop; the
/// semantic variants (credential, not-found, remote) come from HTTP status
/// mapping and are never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure that survived all retry attempts.
    #[error("Network failure after retries: {source}")]
    Network {
        /// The final transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The instance rejected the API key (HTTP 401/403).
    #[error("Invalid or rejected API key")]
    InvalidCredential,

    /// The workflow endpoint was not found (HTTP 404); usually a wrong
    /// base URL.
    #[error("Workflow API not found; check the instance base URL")]
    NotFound,

    /// Any other non-2xx response.
    #[error("Remote API error: {status} {status_text}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// HTTP status text.
        status_text: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("Malformed API response: {0}")]
    Json(#[from] serde_json::Error),

    /// Client construction or body-read failure outside the retry loop.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
