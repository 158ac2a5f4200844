//! Connectivity probes for workflow instances.

use std::time::Instant;
use tracing::debug;

use crate::client::{WorkflowApi, WORKFLOW_LIMIT_CEILING};
use crate::error::ApiError;

/// Result of a successful connectivity check.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Number of workflows visible with the supplied credential.
    pub workflow_count: usize,
    /// Round-trip time of the probe request in milliseconds.
    pub response_time_ms: u64,
}

/// Checks that an instance is reachable and the credential is accepted.
///
/// Issues a single workflow list request at the configured ceiling. A
/// success proves both reachability and credential validity and reports
/// how many workflows the credential can see.
///
/// # Errors
///
/// Propagates the client's [`ApiError`] unchanged; callers attach the
/// human-facing message.
pub async fn probe_instance(
    api: &dyn WorkflowApi,
    base_url: &str,
    api_key: &str,
) -> Result<ProbeReport, ApiError> {
    let start = Instant::now();

    debug!(base_url = %base_url, "Probing instance connectivity");
    let records = api
        .list_workflows(base_url, api_key, Some(WORKFLOW_LIMIT_CEILING))
        .await?;

    let elapsed = start.elapsed();
    Ok(ProbeReport {
        workflow_count: records.len(),
        response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowdeck_core::WorkflowRecord;

    struct CannedApi {
        outcome: Result<usize, fn() -> ApiError>,
    }

    #[async_trait]
    impl WorkflowApi for CannedApi {
        async fn list_workflows(
            &self,
            _base_url: &str,
            _api_key: &str,
            limit: Option<u32>,
        ) -> Result<Vec<WorkflowRecord>, ApiError> {
            // The probe always asks for the full ceiling.
            assert_eq!(limit, Some(WORKFLOW_LIMIT_CEILING));
            match &self.outcome {
                Ok(count) => Ok(canned_records(*count)),
                Err(make) => Err(make()),
            }
        }
    }

    fn canned_records(count: usize) -> Vec<WorkflowRecord> {
        (0..count)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("wf-{i}"),
                    "name": format!("Workflow {i}"),
                    "active": true
                }))
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn reports_workflow_count_on_success() {
        let api = CannedApi { outcome: Ok(7) };
        let report = probe_instance(&api, "https://a.test", "abcdefghij")
            .await
            .unwrap();
        assert_eq!(report.workflow_count, 7);
    }

    #[tokio::test]
    async fn propagates_credential_failures() {
        let api = CannedApi {
            outcome: Err(|| ApiError::InvalidCredential),
        };
        let err = probe_instance(&api, "https://a.test", "bad-key-000")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential));
    }
}
