//! Service error type and stable error codes.

use flowdeck_fetch::ApiError;
use flowdeck_store::StoreError;
use thiserror::Error;

/// Error surfaced by the orchestrator to its callers.
///
/// Lower-layer errors pass through unchanged; the service adds only the
/// caller-usage variants and the stable machine-readable [`code`] the UI
/// maps to human sentences.
///
/// [`code`]: ServiceError::code
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller supplied no instance id.
    #[error("No instance id supplied")]
    MissingInstanceId,

    /// No profile exists for the supplied id.
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// Remote API failure (credential, endpoint, status, or transport).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Registry or cache store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable machine-readable code for UI-side message mapping.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingInstanceId => "missing_instance_id",
            ServiceError::InstanceNotFound(_) => "instance_not_found",
            ServiceError::Api(ApiError::InvalidCredential) => "invalid_credential",
            ServiceError::Api(ApiError::NotFound) => "resource_not_found",
            ServiceError::Api(ApiError::Remote { .. } | ApiError::Json(_)) => "remote_api_error",
            ServiceError::Api(ApiError::Network { .. } | ApiError::Http(_)) => "network_error",
            ServiceError::Store(StoreError::Validation(_)) => "validation_error",
            ServiceError::Store(_) => "storage_error",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServiceError::MissingInstanceId.code(), "missing_instance_id");
        assert_eq!(
            ServiceError::InstanceNotFound("x".into()).code(),
            "instance_not_found"
        );
        assert_eq!(
            ServiceError::Api(ApiError::InvalidCredential).code(),
            "invalid_credential"
        );
        assert_eq!(ServiceError::Api(ApiError::NotFound).code(), "resource_not_found");
        assert_eq!(
            ServiceError::Api(ApiError::Remote {
                status: 500,
                status_text: "Internal Server Error".into()
            })
            .code(),
            "remote_api_error"
        );
        assert_eq!(
            ServiceError::Store(StoreError::Validation("bad".into())).code(),
            "validation_error"
        );
    }
}
