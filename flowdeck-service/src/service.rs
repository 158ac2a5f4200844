//! Fetch orchestration over the registry, cache, and API client.

use flowdeck_core::{InstanceDraft, InstanceProfile, WorkflowRecord};
use flowdeck_fetch::{probe_instance, WorkflowApi};
use flowdeck_store::{InstanceRegistry, WorkflowCache};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ServiceError;

/// Result of a workflow fetch, with its provenance.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The workflow records.
    pub records: Vec<WorkflowRecord>,
    /// Whether the records came from the cache rather than the network.
    pub served_from_cache: bool,
}

/// Result of a successful connectivity test.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Number of workflows visible with the profile's credential.
    pub workflow_count: usize,
    /// Round-trip time of the probe request in milliseconds.
    pub response_time_ms: u64,
}

/// The caching/fetch engine's public entry point.
///
/// Constructed once at process start and shared by handle; the cache it
/// owns is process-lifetime state restored from the volatile mirror via
/// [`WorkflowService::start`].
pub struct WorkflowService {
    registry: InstanceRegistry,
    cache: WorkflowCache,
    api: Arc<dyn WorkflowApi>,
}

impl WorkflowService {
    /// Creates a service over the given collaborators.
    pub fn new(registry: InstanceRegistry, cache: WorkflowCache, api: Arc<dyn WorkflowApi>) -> Self {
        Self {
            registry,
            cache,
            api,
        }
    }

    /// Restores the cache from its volatile mirror. Call once at startup;
    /// returns the number of restored entries.
    pub async fn start(&self) -> usize {
        self.cache.restore_from_mirror().await
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    /// Fetches the workflow collection for an instance.
    ///
    /// Serves from the cache while the entry is fresh, unless
    /// `force_refresh` bypasses the check. On a miss the profile is
    /// resolved, the remote API queried, and the cache updated. Remote
    /// failures propagate unchanged; a stale cache entry is never
    /// substituted for an explicit error.
    ///
    /// # Errors
    ///
    /// [`ServiceError::MissingInstanceId`] for a blank id,
    /// [`ServiceError::InstanceNotFound`] for an unknown one, and any
    /// store or API error from the layers below.
    pub async fn fetch_workflows(
        &self,
        instance_id: &str,
        force_refresh: bool,
    ) -> Result<FetchOutcome, ServiceError> {
        if instance_id.trim().is_empty() {
            return Err(ServiceError::MissingInstanceId);
        }

        if !force_refresh && self.cache.is_valid(instance_id).await {
            if let Some(entry) = self.cache.get(instance_id).await {
                debug!(id = %instance_id, "Serving workflows from cache");
                return Ok(FetchOutcome {
                    records: entry.records,
                    served_from_cache: true,
                });
            }
        }

        let profile = self
            .registry
            .get_by_id(instance_id)
            .await?
            .ok_or_else(|| ServiceError::InstanceNotFound(instance_id.to_string()))?;

        let records = self
            .api
            .list_workflows(&profile.base_url, &profile.api_key, None)
            .await?;

        self.cache.update(instance_id, records.clone()).await;

        // Using a profile for a fetch counts as a touch; losing the touch
        // must not fail an otherwise successful fetch.
        if let Err(e) = self.registry.touch(instance_id).await {
            warn!(id = %instance_id, error = %e, "Failed to refresh last-used timestamp");
        }

        info!(id = %instance_id, count = records.len(), "Workflows fetched from remote");
        Ok(FetchOutcome {
            records,
            served_from_cache: false,
        })
    }

    /// Invalidates the instance's cache entry, then runs the normal fetch
    /// path with the check bypassed. Expressed through `fetch_workflows`
    /// so forced refresh can never diverge from the ordinary path.
    ///
    /// # Errors
    ///
    /// Same as [`WorkflowService::fetch_workflows`].
    pub async fn refresh_workflows(&self, instance_id: &str) -> Result<FetchOutcome, ServiceError> {
        if instance_id.trim().is_empty() {
            return Err(ServiceError::MissingInstanceId);
        }
        self.cache.invalidate(Some(instance_id)).await;
        self.fetch_workflows(instance_id, true).await
    }

    /// Checks that an instance is reachable and its credential accepted.
    ///
    /// # Errors
    ///
    /// Same resolution errors as a fetch, plus any API error from the
    /// probe request itself.
    pub async fn test_connection(&self, instance_id: &str) -> Result<ProbeOutcome, ServiceError> {
        if instance_id.trim().is_empty() {
            return Err(ServiceError::MissingInstanceId);
        }

        let profile = self
            .registry
            .get_by_id(instance_id)
            .await?
            .ok_or_else(|| ServiceError::InstanceNotFound(instance_id.to_string()))?;

        let report = probe_instance(self.api.as_ref(), &profile.base_url, &profile.api_key).await?;
        Ok(ProbeOutcome {
            workflow_count: report.workflow_count,
            response_time_ms: report.response_time_ms,
        })
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Returns all configured instance profiles keyed by id.
    ///
    /// # Errors
    ///
    /// Propagates durable-store failures.
    pub async fn get_all_instances(
        &self,
    ) -> Result<HashMap<String, InstanceProfile>, ServiceError> {
        Ok(self.registry.list_all().await?)
    }

    /// Looks up one profile by id.
    ///
    /// # Errors
    ///
    /// Propagates durable-store failures; an unknown id is `None`.
    pub async fn get_instance_by_id(
        &self,
        instance_id: &str,
    ) -> Result<Option<InstanceProfile>, ServiceError> {
        Ok(self.registry.get_by_id(instance_id).await?)
    }

    /// Looks up the profile matching a URL's origin.
    ///
    /// # Errors
    ///
    /// Propagates durable-store failures; no match is `None`.
    pub async fn get_instance_by_origin(
        &self,
        origin: &str,
    ) -> Result<Option<InstanceProfile>, ServiceError> {
        Ok(self.registry.get_by_origin(origin).await?)
    }

    /// Validates and persists an instance draft, returning its id.
    ///
    /// # Errors
    ///
    /// Validation and durable-store failures from the registry.
    pub async fn save_instance(&self, draft: InstanceDraft) -> Result<String, ServiceError> {
        Ok(self.registry.save(draft).await?)
    }

    /// Drops cache entries without touching profiles. `None` clears the
    /// whole cache.
    pub async fn invalidate_cache(&self, instance_id: Option<&str>) {
        self.cache.invalidate(instance_id).await;
    }

    /// Returns the id of the selected instance, if one is set.
    ///
    /// # Errors
    ///
    /// Propagates durable-store failures.
    pub async fn selected_instance_id(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.registry.selected_instance_id().await?)
    }

    /// Marks an instance as selected, or clears the selection.
    ///
    /// # Errors
    ///
    /// Validation failure for an unknown id, plus durable-store failures.
    pub async fn set_selected_instance(&self, id: Option<String>) -> Result<(), ServiceError> {
        Ok(self.registry.set_selected(id).await?)
    }

    /// Deletes a profile and invalidates its cache entry.
    ///
    /// The two always travel together: a deleted instance must not leave
    /// workflows behind in the cache.
    ///
    /// # Errors
    ///
    /// Propagates durable-store failures. Unknown ids are a no-op.
    pub async fn delete_instance(&self, instance_id: &str) -> Result<(), ServiceError> {
        self.registry.delete(instance_id).await?;
        self.cache.invalidate(Some(instance_id)).await;
        Ok(())
    }
}
