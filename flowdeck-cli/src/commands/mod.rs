//! CLI command implementations.

pub mod cache;
pub mod fetch;
pub mod instance;

use anyhow::Result;
use flowdeck_fetch::{WorkflowApi, WorkflowClient};
use flowdeck_service::WorkflowService;
use flowdeck_store::{
    default_mirror_path, default_registry_path, FileTier, InstanceRegistry, WorkflowCache,
};
use std::sync::Arc;
use tracing::debug;

/// Builds the workflow service over the default on-disk tiers and restores
/// the cache mirror.
pub async fn build_service() -> Result<WorkflowService> {
    let registry = InstanceRegistry::new(Arc::new(FileTier::new(default_registry_path())));
    let cache = WorkflowCache::new(Arc::new(FileTier::new(default_mirror_path())));
    let api: Arc<dyn WorkflowApi> = Arc::new(WorkflowClient::new()?);

    let service = WorkflowService::new(registry, cache, api);
    let restored = service.start().await;
    debug!(restored, "Cache mirror restored");

    Ok(service)
}

/// Resolves the instance to operate on: an explicit `--instance` id wins,
/// otherwise the selected instance is used.
pub async fn resolve_instance_id(
    service: &WorkflowService,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id.to_string());
    }
    match service.selected_instance_id().await? {
        Some(id) => Ok(id),
        None => anyhow::bail!(
            "No instance selected. Pass --instance <id> or run 'flowdeck instance select <id>'"
        ),
    }
}
