//! Realtime datastore collaborator contract.
//!
//! A path-addressed key-value store with a server-assigned timestamp
//! primitive. Callers of the registry persist asset records through this
//! contract; the hosted implementation lives outside the workspace.
//! [`MemoryDatastore`] is the in-process implementation used by tests and
//! offline tooling.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    #[error("Invalid datastore path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Datastore backend error: {0}")]
    Backend(String),
}

/// Sentinel value the datastore resolves to its own clock at write time,
/// mirroring the hosted store's server-timestamp primitive.
pub fn server_timestamp() -> Value {
    serde_json::json!({ ".sv": "timestamp" })
}

fn is_timestamp_sentinel(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.len() == 1 && obj.get(".sv").and_then(Value::as_str) == Some("timestamp"))
        .unwrap_or(false)
}

#[async_trait]
pub trait Datastore: Send + Sync {
    async fn read(&self, path: &str) -> Result<Option<Value>, DatastoreError>;

    /// Write a value at `path`, replacing any existing subtree. Timestamp
    /// sentinels anywhere in the value are resolved to the store's clock.
    async fn write(&self, path: &str, value: Value) -> Result<(), DatastoreError>;

    /// Remove the value at `path` and everything beneath it.
    async fn remove(&self, path: &str) -> Result<(), DatastoreError>;

    /// Direct children of `path` as (key, value) pairs, ordered by key.
    async fn read_children(&self, path: &str) -> Result<Vec<(String, Value)>, DatastoreError>;
}

/// In-memory datastore.
#[derive(Default)]
pub struct MemoryDatastore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_path(path: &str) -> Result<(), DatastoreError> {
        if path.is_empty() || path.starts_with('/') || path.ends_with('/') || path.contains("//") {
            return Err(DatastoreError::InvalidPath(path.to_string()));
        }
        Ok(())
    }

    fn resolve_timestamps(value: &mut Value, now_ms: i64) {
        if is_timestamp_sentinel(value) {
            *value = Value::from(now_ms);
            return;
        }
        match value {
            Value::Object(map) => {
                for child in map.values_mut() {
                    Self::resolve_timestamps(child, now_ms);
                }
            }
            Value::Array(items) => {
                for child in items.iter_mut() {
                    Self::resolve_timestamps(child, now_ms);
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn read(&self, path: &str) -> Result<Option<Value>, DatastoreError> {
        Self::validate_path(path)?;
        Ok(self.entries.lock().await.get(path).cloned())
    }

    async fn write(&self, path: &str, mut value: Value) -> Result<(), DatastoreError> {
        Self::validate_path(path)?;
        Self::resolve_timestamps(&mut value, Utc::now().timestamp_millis());
        self.entries.lock().await.insert(path.to_string(), value);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), DatastoreError> {
        Self::validate_path(path)?;
        let prefix = format!("{path}/");
        let mut entries = self.entries.lock().await;
        entries.remove(path);
        entries.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    async fn read_children(&self, path: &str) -> Result<Vec<(String, Value)>, DatastoreError> {
        Self::validate_path(path)?;
        let prefix = format!("{path}/");
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter_map(|(key, value)| {
                let rest = key.strip_prefix(&prefix)?;
                if rest.is_empty() || rest.contains('/') {
                    return None;
                }
                Some((rest.to_string(), value.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_read_remove() {
        let store = MemoryDatastore::new();
        store
            .write("assets/G-1", json!({ "status": "unmarked" }))
            .await
            .unwrap();

        let value = store.read("assets/G-1").await.unwrap().unwrap();
        assert_eq!(value["status"], "unmarked");

        store.remove("assets/G-1").await.unwrap();
        assert!(store.read("assets/G-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_clears_subtree() {
        let store = MemoryDatastore::new();
        store.write("assets/G-1", json!(1)).await.unwrap();
        store.write("assets/G-2", json!(2)).await.unwrap();
        store.write("backups/1", json!(3)).await.unwrap();

        store.remove("assets").await.unwrap();
        assert!(store.read("assets/G-1").await.unwrap().is_none());
        assert!(store.read("assets/G-2").await.unwrap().is_none());
        assert!(store.read("backups/1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_read_children_is_direct_only() {
        let store = MemoryDatastore::new();
        store.write("assets/G-1", json!(1)).await.unwrap();
        store.write("assets/G-2", json!(2)).await.unwrap();
        store.write("assets/G-2/extra", json!(3)).await.unwrap();
        store.write("other/X", json!(4)).await.unwrap();

        let children = store.read_children("assets").await.unwrap();
        let keys: Vec<_> = children.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["G-1", "G-2"]);
    }

    #[tokio::test]
    async fn test_timestamp_sentinel_resolved_at_write() {
        let store = MemoryDatastore::new();
        store
            .write(
                "backups/1",
                json!({ "written_at": server_timestamp(), "n": 1 }),
            )
            .await
            .unwrap();

        let value = store.read("backups/1").await.unwrap().unwrap();
        let written_at = value["written_at"].as_i64().unwrap();
        assert!(written_at > 1_600_000_000_000);
        assert_eq!(value["n"], 1);
    }

    #[tokio::test]
    async fn test_invalid_paths_rejected() {
        let store = MemoryDatastore::new();
        for path in ["", "/abs", "trailing/", "a//b"] {
            assert!(matches!(
                store.read(path).await,
                Err(DatastoreError::InvalidPath(_))
            ));
        }
    }
}
