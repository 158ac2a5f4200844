//! Cached workflow collection types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ShapeError;
use crate::models::workflow::WorkflowRecord;

/// Default freshness window for cached workflow collections: 5 minutes.
pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;

/// One cached workflow collection for a single instance.
///
/// An entry is fresh while `now - fetched_at < ttl`. Staleness is computed
/// on read; stale entries stay in place until overwritten or invalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The workflow records, in the order the API returned them.
    pub records: Vec<WorkflowRecord>,

    /// When the fetch that produced this entry completed.
    pub fetched_at: DateTime<Utc>,

    /// Freshness window in milliseconds.
    pub ttl_ms: u64,
}

impl CacheEntry {
    /// Whether the entry is still fresh at the given time.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        let ttl = Duration::milliseconds(i64::try_from(self.ttl_ms).unwrap_or(i64::MAX));
        now.signed_duration_since(self.fetched_at) < ttl
    }

    /// Parses a persisted value into a typed entry.
    ///
    /// This is the single shape check applied at the volatile-store
    /// boundary: a non-sequence `records` field or a missing/non-numeric
    /// timestamp fails the parse, and the caller discards the entry.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] when the value does not match the entry shape.
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        let entry: Self = serde_json::from_value(value)?;
        Ok(entry)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<WorkflowRecord> {
        serde_json::from_value(serde_json::json!([
            {"id": "1", "name": "A", "active": true}
        ]))
        .unwrap()
    }

    #[test]
    fn fresh_within_ttl_stale_after() {
        let entry = CacheEntry {
            records: records(),
            fetched_at: Utc::now(),
            ttl_ms: 300_000,
        };
        let t = entry.fetched_at;

        assert!(entry.is_fresh_at(t + Duration::milliseconds(299_999)));
        assert!(!entry.is_fresh_at(t + Duration::milliseconds(300_000)));
        assert!(!entry.is_fresh_at(t + Duration::milliseconds(300_001)));
    }

    #[test]
    fn from_value_accepts_well_formed_entries() {
        let value = serde_json::json!({
            "records": [{"id": "1", "name": "A", "active": true}],
            "fetchedAt": "2025-06-01T12:00:00Z",
            "ttlMs": 300_000
        });
        let entry = CacheEntry::from_value(value).unwrap();
        assert_eq!(entry.records.len(), 1);
        assert_eq!(entry.ttl_ms, 300_000);
    }

    #[test]
    fn from_value_rejects_non_sequence_records() {
        let value = serde_json::json!({
            "records": "not-a-list",
            "fetchedAt": "2025-06-01T12:00:00Z",
            "ttlMs": 300_000
        });
        assert!(CacheEntry::from_value(value).is_err());
    }

    #[test]
    fn from_value_rejects_missing_timestamp() {
        let value = serde_json::json!({
            "records": [],
            "ttlMs": 300_000
        });
        assert!(CacheEntry::from_value(value).is_err());
    }

    #[test]
    fn empty_record_sequence_is_valid() {
        let value = serde_json::json!({
            "records": [],
            "fetchedAt": "2025-06-01T12:00:00Z",
            "ttlMs": 300_000
        });
        assert!(CacheEntry::from_value(value).is_ok());
    }
}
