//! Inbound request dispatch.
//!
//! UI collaborators (panels, popups, command-line) speak to the service
//! through a tagged request type. One exhaustive match covers the eight
//! operations, so adding a ninth fails to compile until every dispatcher
//! handles it.

use flowdeck_core::InstanceDraft;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ServiceError;
use crate::service::WorkflowService;

// ============================================================================
// Request
// ============================================================================

/// One inbound operation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Fetch the workflow collection, cache permitting.
    FetchWorkflows {
        /// Target instance id.
        instance_id: String,
        /// Bypass the cache validity check.
        #[serde(default)]
        force_refresh: bool,
    },
    /// Invalidate and re-fetch the workflow collection.
    RefreshWorkflows {
        /// Target instance id.
        instance_id: String,
    },
    /// Validate reachability and credential of an instance.
    TestConnection {
        /// Target instance id.
        instance_id: String,
    },
    /// List every configured instance profile.
    GetAllInstances,
    /// Look up one profile by id.
    GetInstanceById {
        /// Target instance id.
        instance_id: String,
    },
    /// Look up the profile matching a URL's origin.
    GetInstanceByOrigin {
        /// Any URL within the instance.
        origin: String,
    },
    /// Create or update an instance profile.
    SaveInstance {
        /// The profile draft to validate and persist.
        instance: InstanceDraft,
    },
    /// Delete a profile and its cache entry.
    DeleteInstance {
        /// Target instance id.
        instance_id: String,
    },
}

// ============================================================================
// Envelope
// ============================================================================

/// Reply envelope: `{success: true, ...payload}` or
/// `{success: false, error, message}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Stable machine-readable error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-facing failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Operation payload, flattened beside `success`.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Builds a success envelope from an object payload.
    fn ok(payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        Self {
            success: true,
            error: None,
            message: None,
            payload,
        }
    }

    /// Builds a failure envelope carrying the stable code and message.
    fn failure(err: &ServiceError) -> Self {
        Self {
            success: false,
            error: Some(err.code().to_string()),
            message: Some(err.to_string()),
            payload: Map::new(),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

impl WorkflowService {
    /// Handles one inbound request and replies with an [`Envelope`].
    ///
    /// Errors never escape this boundary; they are folded into the
    /// failure envelope with their stable code.
    pub async fn dispatch(&self, request: Request) -> Envelope {
        debug!(request = ?request, "Dispatching request");

        let result = match request {
            Request::FetchWorkflows {
                instance_id,
                force_refresh,
            } => self
                .fetch_workflows(&instance_id, force_refresh)
                .await
                .map(|outcome| {
                    json!({
                        "workflows": outcome.records,
                        "servedFromCache": outcome.served_from_cache,
                    })
                }),

            Request::RefreshWorkflows { instance_id } => {
                self.refresh_workflows(&instance_id).await.map(|outcome| {
                    json!({
                        "workflows": outcome.records,
                        "servedFromCache": outcome.served_from_cache,
                    })
                })
            }

            Request::TestConnection { instance_id } => {
                self.test_connection(&instance_id).await.map(|outcome| {
                    json!({
                        "ok": true,
                        "workflowCount": outcome.workflow_count,
                        "responseTimeMs": outcome.response_time_ms,
                    })
                })
            }

            Request::GetAllInstances => self
                .get_all_instances()
                .await
                .map(|instances| json!({ "instances": instances })),

            Request::GetInstanceById { instance_id } => self
                .get_instance_by_id(&instance_id)
                .await
                .map(|instance| json!({ "instance": instance })),

            Request::GetInstanceByOrigin { origin } => self
                .get_instance_by_origin(&origin)
                .await
                .map(|instance| json!({ "instance": instance })),

            Request::SaveInstance { instance } => self
                .save_instance(instance)
                .await
                .map(|id| json!({ "instanceId": id })),

            Request::DeleteInstance { instance_id } => self
                .delete_instance(&instance_id)
                .await
                .map(|()| json!({})),
        };

        match result {
            Ok(payload) => Envelope::ok(payload),
            Err(e) => Envelope::failure(&e),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
