//! Workflow record types.
//!
//! Workflow records are owned by the remote API and passed through
//! verbatim. Only the three fields the cache layer relies on are typed;
//! everything else rides along in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One workflow as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    /// Remote identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Whether the workflow is active on the remote instance.
    #[serde(default)]
    pub active: bool,

    /// All remaining fields, preserved verbatim (createdAt, updatedAt,
    /// tags, and whatever else the API version includes).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `{"data": [...]}` envelope wrapping workflow list responses.
///
/// A well-formed envelope with no `data` field deserializes to an empty
/// collection rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowEnvelope {
    /// The workflow records, possibly empty.
    #[serde(default)]
    pub data: Vec<WorkflowRecord>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_unknown_fields() {
        let json = serde_json::json!({
            "id": "wf-1",
            "name": "Sync contacts",
            "active": true,
            "createdAt": "2025-01-04T10:00:00.000Z",
            "nodes": [{"type": "webhook"}]
        });

        let record: WorkflowRecord = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(record.id, "wf-1");
        assert!(record.active);
        assert!(record.extra.contains_key("createdAt"));
        assert!(record.extra.contains_key("nodes"));

        // Round-trip keeps the pass-through fields intact.
        assert_eq!(serde_json::to_value(&record).unwrap(), json);
    }

    #[test]
    fn envelope_without_data_is_empty() {
        let envelope: WorkflowEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn record_defaults_active_to_false() {
        let record: WorkflowRecord =
            serde_json::from_value(serde_json::json!({"id": "x", "name": "y"})).unwrap();
        assert!(!record.active);
    }
}
