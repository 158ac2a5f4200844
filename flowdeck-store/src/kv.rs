//! Key-value tiers backing the registry and cache.
//!
//! Two tiers with the same get/set/remove shape:
//!
//! - the **durable** tier holds the instance registry document and
//!   survives indefinitely (config dir)
//! - the **volatile** tier holds the cache mirror; its contents are only
//!   trusted after shape validation and may vanish at any restart
//!   boundary (cache dir)
//!
//! Both are served by [`FileTier`], one JSON document per tier, written
//! atomically with restrictive permissions. [`MemoryTier`] backs tests and
//! embedded use.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/Flowdeck`
/// - Linux: `~/.config/flowdeck`
/// - Windows: `%APPDATA%\Flowdeck`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("Flowdeck"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("flowdeck"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default cache directory.
///
/// - macOS: `~/Library/Caches/Flowdeck`
/// - Linux: `~/.cache/flowdeck`
/// - Windows: `%LOCALAPPDATA%\Flowdeck\cache`
pub fn default_cache_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Caches").join("Flowdeck"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|c| c.join("flowdeck"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Default path of the durable registry document.
pub fn default_registry_path() -> PathBuf {
    default_config_dir().join("instances.json")
}

/// Default path of the volatile cache mirror.
pub fn default_mirror_path() -> PathBuf {
    default_cache_dir().join("workflow_cache.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
///
/// Tier files can contain credentials, so they must only be readable by
/// the owner.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Key-Value Tier Trait
// ============================================================================

/// One key-value tier with get/set/remove semantics.
///
/// Values are raw JSON; shape validation belongs to the caller reading
/// them back.
#[async_trait]
pub trait KeyValueTier: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes the value stored under `key`. Absent keys are a no-op.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// File Tier
// ============================================================================

/// A [`KeyValueTier`] backed by one JSON document on disk.
///
/// Writes go through a temp file + rename so a crash never leaves a torn
/// document, and the write lock serializes concurrent mutations within
/// the process.
pub struct FileTier {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTier {
    /// Creates a tier stored at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the whole document, treating a missing file as empty.
    async fn load_document(&self) -> Result<Map<String, Value>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let value: Value = serde_json::from_str(&content)?;
                match value {
                    Value::Object(map) => Ok(map),
                    _ => Err(StoreError::Serialization(serde::de::Error::custom(
                        "tier document is not a JSON object",
                    ))),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the whole document atomically with secure permissions.
    async fn store_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                debug!(path = %parent.display(), "Creating tier directory");
                tokio::fs::create_dir_all(parent).await?;
                set_restrictive_dir_permissions(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&document)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        set_restrictive_permissions(&self.path).await?;

        debug!(path = %self.path.display(), "Tier document saved");
        Ok(())
    }
}

#[async_trait]
impl KeyValueTier for FileTier {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let document = self.load_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await?;
        document.insert(key.to_string(), value);
        self.store_document(&document).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await?;
        if document.remove(key).is_some() {
            self.store_document(&document).await?;
        }
        Ok(())
    }
}

// ============================================================================
// Memory Tier
// ============================================================================

/// An in-memory [`KeyValueTier`] for tests and embedded use.
#[derive(Default)]
pub struct MemoryTier {
    map: RwLock<HashMap<String, Value>>,
}

impl MemoryTier {
    /// Creates an empty tier.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueTier for MemoryTier {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.map.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_paths_are_rooted() {
        assert!(!default_config_dir().as_os_str().is_empty());
        assert!(default_registry_path().ends_with("instances.json"));
        assert!(default_mirror_path().ends_with("workflow_cache.json"));
    }

    #[tokio::test]
    async fn file_tier_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let tier = FileTier::new(dir.path().join("tier.json"));

        assert!(tier.get("missing").await.unwrap().is_none());

        tier.set("alpha", json!({"n": 1})).await.unwrap();
        tier.set("beta", json!([1, 2, 3])).await.unwrap();

        assert_eq!(tier.get("alpha").await.unwrap(), Some(json!({"n": 1})));
        assert_eq!(tier.get("beta").await.unwrap(), Some(json!([1, 2, 3])));

        tier.remove("alpha").await.unwrap();
        assert!(tier.get("alpha").await.unwrap().is_none());
        assert_eq!(tier.get("beta").await.unwrap(), Some(json!([1, 2, 3])));
    }

    #[tokio::test]
    async fn file_tier_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tier.json");

        {
            let tier = FileTier::new(path.clone());
            tier.set("key", json!("value")).await.unwrap();
        }

        let tier = FileTier::new(path);
        assert_eq!(tier.get("key").await.unwrap(), Some(json!("value")));
    }

    #[tokio::test]
    async fn removing_absent_key_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let tier = FileTier::new(dir.path().join("tier.json"));
        tier.remove("never-set").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tier_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tier.json");
        let tier = FileTier::new(path.clone());
        tier.set("key", json!(1)).await.unwrap();

        let metadata = tokio::fs::metadata(&path).await.unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[tokio::test]
    async fn memory_tier_round_trips_values() {
        let tier = MemoryTier::new();
        tier.set("k", json!(true)).await.unwrap();
        assert_eq!(tier.get("k").await.unwrap(), Some(json!(true)));
        tier.remove("k").await.unwrap();
        assert!(tier.get("k").await.unwrap().is_none());
    }
}
