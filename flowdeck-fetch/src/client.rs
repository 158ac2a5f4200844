//! Remote workflow API client.

use async_trait::async_trait;
use flowdeck_core::{WorkflowEnvelope, WorkflowRecord};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::retry::{retry_transient, RetryPolicy};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the instance API key.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Default and hard ceiling for the workflow list page size.
pub const WORKFLOW_LIMIT_CEILING: u32 = 250;

// ============================================================================
// Workflow API Trait
// ============================================================================

/// Read access to a remote instance's workflow collection.
///
/// This is the seam between the orchestrator and the network; tests swap
/// in a canned implementation.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Fetches the workflow collection from an instance.
    ///
    /// `limit` defaults to [`WORKFLOW_LIMIT_CEILING`] and is clamped to it.
    async fn list_workflows(
        &self,
        base_url: &str,
        api_key: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WorkflowRecord>, ApiError>;
}

// ============================================================================
// Workflow Client
// ============================================================================

/// HTTP implementation of [`WorkflowApi`] with retry on transport failures.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: Client,
    retry: RetryPolicy,
}

impl WorkflowClient {
    /// Creates a client with the default 30s timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be built.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flowdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            retry: RetryPolicy::default(),
        })
    }

    /// Sets the retry policy for this client.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the workflow list URL for an instance origin.
    fn workflows_url(base_url: &str, limit: u32) -> String {
        format!(
            "{}/api/v1/workflows?limit={limit}",
            base_url.trim_end_matches('/')
        )
    }

    /// Clamps a requested page size to the API ceiling.
    fn effective_limit(limit: Option<u32>) -> u32 {
        limit
            .unwrap_or(WORKFLOW_LIMIT_CEILING)
            .min(WORKFLOW_LIMIT_CEILING)
    }

    /// Maps a non-success status to its typed error.
    fn classify_status(status: StatusCode) -> Option<ApiError> {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(ApiError::InvalidCredential),
            StatusCode::NOT_FOUND => Some(ApiError::NotFound),
            s if !s.is_success() => Some(ApiError::Remote {
                status: s.as_u16(),
                status_text: s.canonical_reason().unwrap_or("Unknown").to_string(),
            }),
            _ => None,
        }
    }
}

#[async_trait]
impl WorkflowApi for WorkflowClient {
    async fn list_workflows(
        &self,
        base_url: &str,
        api_key: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WorkflowRecord>, ApiError> {
        let limit = Self::effective_limit(limit);
        let url = Self::workflows_url(base_url, limit);

        debug!(url = %url, "Fetching workflow collection");

        let response = retry_transient(&self.retry, || {
            self.http
                .get(&url)
                .header(API_KEY_HEADER, api_key)
                .header(header::ACCEPT, "application/json")
                .send()
        })
        .await
        .map_err(|source| ApiError::Network { source })?;

        if let Some(err) = Self::classify_status(response.status()) {
            return Err(err);
        }

        let body = response.bytes().await?;
        let envelope: WorkflowEnvelope = serde_json::from_slice(&body)?;

        debug!(count = envelope.data.len(), "Workflow collection fetched");
        Ok(envelope.data)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_api_path_and_limit() {
        assert_eq!(
            WorkflowClient::workflows_url("https://flows.example.com", 250),
            "https://flows.example.com/api/v1/workflows?limit=250"
        );
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        assert_eq!(
            WorkflowClient::workflows_url("http://localhost:5678/", 10),
            "http://localhost:5678/api/v1/workflows?limit=10"
        );
    }

    #[test]
    fn limit_defaults_to_ceiling_and_is_clamped() {
        assert_eq!(WorkflowClient::effective_limit(None), 250);
        assert_eq!(WorkflowClient::effective_limit(Some(10)), 10);
        assert_eq!(WorkflowClient::effective_limit(Some(9999)), 250);
    }

    #[test]
    fn auth_statuses_map_to_invalid_credential() {
        assert!(matches!(
            WorkflowClient::classify_status(StatusCode::UNAUTHORIZED),
            Some(ApiError::InvalidCredential)
        ));
        assert!(matches!(
            WorkflowClient::classify_status(StatusCode::FORBIDDEN),
            Some(ApiError::InvalidCredential)
        ));
    }

    #[test]
    fn missing_endpoint_maps_to_not_found() {
        assert!(matches!(
            WorkflowClient::classify_status(StatusCode::NOT_FOUND),
            Some(ApiError::NotFound)
        ));
    }

    #[test]
    fn other_failures_carry_status_and_text() {
        match WorkflowClient::classify_status(StatusCode::INTERNAL_SERVER_ERROR) {
            Some(ApiError::Remote {
                status,
                status_text,
            }) => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
            }
            other => panic!("expected Remote error, got {other:?}"),
        }
    }

    #[test]
    fn success_statuses_are_not_errors() {
        assert!(WorkflowClient::classify_status(StatusCode::OK).is_none());
        assert!(WorkflowClient::classify_status(StatusCode::NO_CONTENT).is_none());
    }
}
