//! JSON output formatting.
//!
//! Profiles are re-shaped into dedicated output types so the API key never
//! reaches stdout.

use anyhow::Result;
use chrono::{DateTime, Utc};
use flowdeck_core::InstanceProfile;
use flowdeck_service::FetchOutcome;
use serde::{Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a single instance profile, credential omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOutput {
    pub id: String,
    pub name: String,
    pub base_url: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_datetime")]
    pub last_used_at: DateTime<Utc>,
    pub selected: bool,
}

impl InstanceOutput {
    /// Builds the output view of a profile.
    pub fn new(profile: &InstanceProfile, selected_id: Option<&str>) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            base_url: profile.base_url.clone(),
            created_at: profile.created_at,
            last_used_at: profile.last_used_at,
            selected: selected_id == Some(profile.id.as_str()),
        }
    }
}

/// JSON output for a fetched workflow collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListOutput {
    pub instance_id: String,
    pub served_from_cache: bool,
    pub count: usize,
    pub workflows: Vec<Value>,
}

impl WorkflowListOutput {
    /// Builds the output view of a fetch outcome.
    pub fn new(instance_id: &str, outcome: &FetchOutcome) -> Self {
        let workflows = outcome
            .records
            .iter()
            .map(|record| serde_json::to_value(record).unwrap_or(Value::Null))
            .collect::<Vec<_>>();
        Self {
            instance_id: instance_id.to_string(),
            served_from_cache: outcome.served_from_cache,
            count: workflows.len(),
            workflows,
        }
    }
}

/// JSON output for a connectivity check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub ok: bool,
    pub instance_id: String,
    pub workflow_count: usize,
    pub response_time_ms: u64,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
