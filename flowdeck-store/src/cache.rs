//! Per-instance workflow cache.
//!
//! The in-memory map is the single source of truth for the process
//! lifetime. Every update is mirrored to the volatile tier so a restarted
//! process can pick up where it left off instead of re-fetching every
//! instance at once; mirror failures degrade to cache-only operation and
//! are never fatal.

use chrono::{DateTime, Utc};
use flowdeck_core::{CacheEntry, WorkflowRecord, DEFAULT_CACHE_TTL_MS};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::kv::KeyValueTier;

/// Volatile-tier key under which the mirrored entries live.
pub const MIRROR_KEY: &str = "workflowCache";

/// Cache of workflow collections, keyed by instance id.
pub struct WorkflowCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    mirror: Arc<dyn KeyValueTier>,
    ttl_ms: u64,
}

impl WorkflowCache {
    /// Creates an empty cache mirrored to the given volatile tier.
    pub fn new(mirror: Arc<dyn KeyValueTier>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            mirror,
            ttl_ms: DEFAULT_CACHE_TTL_MS,
        }
    }

    /// Sets the freshness window applied to new entries.
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Whether a fresh entry exists for the instance right now.
    pub async fn is_valid(&self, id: &str) -> bool {
        self.is_valid_at(id, Utc::now()).await
    }

    /// Whether a fresh entry exists for the instance at the given time.
    pub async fn is_valid_at(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .read()
            .await
            .get(id)
            .is_some_and(|entry| entry.is_fresh_at(now))
    }

    /// Returns the entry for an instance regardless of freshness.
    ///
    /// Callers that care about freshness check [`Self::is_valid`] first;
    /// the separation is what lets forced refresh bypass the check.
    pub async fn get(&self, id: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(id).cloned()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Stores a freshly fetched collection for an instance.
    ///
    /// The entry is stamped with the current time and the cache ttl, then
    /// mirrored to the volatile tier. A mirror failure is logged and
    /// swallowed; the in-memory entry stays authoritative.
    pub async fn update(&self, id: &str, records: Vec<WorkflowRecord>) {
        let entry = CacheEntry {
            records,
            fetched_at: Utc::now(),
            ttl_ms: self.ttl_ms,
        };

        {
            let mut entries = self.entries.write().await;
            entries.insert(id.to_string(), entry);
        }
        debug!(id = %id, "Cache entry updated");

        self.write_mirror().await;
    }

    /// Drops the entry for one instance, or every entry when `id` is
    /// `None`. The mirror is kept in step.
    pub async fn invalidate(&self, id: Option<&str>) {
        match id {
            Some(id) => {
                let removed = self.entries.write().await.remove(id).is_some();
                if removed {
                    debug!(id = %id, "Cache entry invalidated");
                    self.write_mirror().await;
                }
            }
            None => {
                self.entries.write().await.clear();
                debug!("Cache cleared");
                if let Err(e) = self.mirror.remove(MIRROR_KEY).await {
                    warn!(error = %e, "Failed to clear cache mirror");
                }
            }
        }
    }

    // ========================================================================
    // Mirror
    // ========================================================================

    /// Restores entries from the volatile mirror at process start.
    ///
    /// Each mirrored value goes through the typed shape check; malformed
    /// entries are discarded. Survivors are kept even when already past
    /// their ttl; staleness is re-evaluated lazily on the next validity
    /// check. Returns the number of restored entries.
    pub async fn restore_from_mirror(&self) -> usize {
        let snapshot = match self.mirror.get(MIRROR_KEY).await {
            Ok(Some(Value::Object(map))) => map,
            Ok(Some(_)) => {
                warn!("Cache mirror is not an object, discarding");
                return 0;
            }
            Ok(None) => return 0,
            Err(e) => {
                warn!(error = %e, "Failed to read cache mirror, starting cold");
                return 0;
            }
        };

        let total = snapshot.len();
        let mut restored = HashMap::new();
        for (id, value) in snapshot {
            match CacheEntry::from_value(value) {
                Ok(entry) => {
                    restored.insert(id, entry);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Discarding malformed mirror entry");
                }
            }
        }

        let survivors = restored.len();
        *self.entries.write().await = restored;

        info!(restored = survivors, discarded = total - survivors, "Cache restored from mirror");
        survivors
    }

    /// Mirrors the full entry map to the volatile tier. Best effort.
    async fn write_mirror(&self) {
        let snapshot = {
            let entries = self.entries.read().await;
            match serde_json::to_value(&*entries) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize cache mirror");
                    return;
                }
            }
        };

        if let Err(e) = self.mirror.set(MIRROR_KEY, snapshot).await {
            warn!(error = %e, "Failed to write cache mirror");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryTier;
    use chrono::Duration;
    use serde_json::json;

    fn records() -> Vec<WorkflowRecord> {
        serde_json::from_value(json!([
            {"id": "1", "name": "A", "active": true}
        ]))
        .unwrap()
    }

    fn cache() -> WorkflowCache {
        WorkflowCache::new(Arc::new(MemoryTier::new()))
    }

    #[tokio::test]
    async fn never_fetched_ids_are_invalid() {
        let cache = cache();
        assert!(!cache.is_valid("ghost").await);
        assert!(cache.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn update_makes_entry_valid_until_ttl_elapses() {
        let cache = cache();
        cache.update("inst", records()).await;

        assert!(cache.is_valid("inst").await);

        let fetched_at = cache.get("inst").await.unwrap().fetched_at;
        assert!(
            cache
                .is_valid_at("inst", fetched_at + Duration::milliseconds(299_999))
                .await
        );
        assert!(
            !cache
                .is_valid_at("inst", fetched_at + Duration::milliseconds(300_001))
                .await
        );
    }

    #[tokio::test]
    async fn invalidate_single_clears_that_entry_only() {
        let cache = cache();
        cache.update("a", records()).await;
        cache.update("b", records()).await;

        cache.invalidate(Some("a")).await;
        assert!(!cache.is_valid("a").await);
        assert!(cache.get("a").await.is_none());
        assert!(cache.is_valid("b").await);
    }

    #[tokio::test]
    async fn invalidate_all_clears_everything() {
        let cache = cache();
        cache.update("a", records()).await;
        cache.update("b", records()).await;

        cache.invalidate(None).await;
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
    }

    #[tokio::test]
    async fn mirror_round_trips_across_restart() {
        let mirror: Arc<dyn KeyValueTier> = Arc::new(MemoryTier::new());

        let first = WorkflowCache::new(Arc::clone(&mirror));
        first.update("inst", records()).await;

        // A fresh cache over the same tier stands in for a restarted process.
        let second = WorkflowCache::new(Arc::clone(&mirror));
        assert_eq!(second.restore_from_mirror().await, 1);
        assert_eq!(second.get("inst").await.unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn restore_discards_malformed_entries() {
        let mirror: Arc<dyn KeyValueTier> = Arc::new(MemoryTier::new());
        mirror
            .set(
                MIRROR_KEY,
                json!({
                    "good": {
                        "records": [{"id": "1", "name": "A", "active": true}],
                        "fetchedAt": "2025-06-01T12:00:00Z",
                        "ttlMs": 300_000
                    },
                    "bad": {
                        "records": "not-a-list",
                        "fetchedAt": "2025-06-01T12:00:00Z",
                        "ttlMs": 300_000
                    },
                    "worse": 42
                }),
            )
            .await
            .unwrap();

        let cache = WorkflowCache::new(Arc::clone(&mirror));
        assert_eq!(cache.restore_from_mirror().await, 1);
        assert!(cache.get("good").await.is_some());
        assert!(cache.get("bad").await.is_none());
        assert!(cache.get("worse").await.is_none());
    }

    #[tokio::test]
    async fn restore_keeps_stale_entries_for_lazy_revalidation() {
        let mirror: Arc<dyn KeyValueTier> = Arc::new(MemoryTier::new());
        mirror
            .set(
                MIRROR_KEY,
                json!({
                    "old": {
                        "records": [],
                        "fetchedAt": "2000-01-01T00:00:00Z",
                        "ttlMs": 300_000
                    }
                }),
            )
            .await
            .unwrap();

        let cache = WorkflowCache::new(Arc::clone(&mirror));
        assert_eq!(cache.restore_from_mirror().await, 1);

        // The entry survives the restore but fails the freshness check.
        assert!(cache.get("old").await.is_some());
        assert!(!cache.is_valid("old").await);
    }

    #[tokio::test]
    async fn invalidation_reaches_the_mirror() {
        let mirror: Arc<dyn KeyValueTier> = Arc::new(MemoryTier::new());

        let cache = WorkflowCache::new(Arc::clone(&mirror));
        cache.update("inst", records()).await;
        cache.invalidate(Some("inst")).await;

        let fresh = WorkflowCache::new(Arc::clone(&mirror));
        assert_eq!(fresh.restore_from_mirror().await, 0);
    }

    #[tokio::test]
    async fn custom_ttl_is_stamped_on_entries() {
        let cache = WorkflowCache::new(Arc::new(MemoryTier::new())).with_ttl_ms(1_000);
        cache.update("inst", records()).await;
        assert_eq!(cache.get("inst").await.unwrap().ttl_ms, 1_000);
    }
}
