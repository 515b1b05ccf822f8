use crate::traits::{BlobStore, PutEvent, StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use kerbside_core::models::PhotoMetadata;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Write granularity for observable puts. One progress event per chunk.
const PUT_CHUNK_BYTES: usize = 256 * 1024;

/// Local filesystem blob store.
///
/// Objects land under `base_path/{key}`; audit metadata is kept in a JSON
/// sidecar next to each object. Reference URLs are `base_url/{key}`.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage
    /// * `base_url` - Base URL objects are served from
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Backend(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that
    /// could escape the base directory.
    fn key_to_path(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StoreError::InvalidKey(format!(
                "Storage key contains invalid characters: {key}"
            )));
        }
        Ok(self.base_path.join(key))
    }

    /// Metadata sidecar path for an object path.
    fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".meta.json");
        PathBuf::from(name)
    }

    /// Public URL for a key.
    fn url_of(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Recover the storage key from one of this store's reference URLs.
    fn key_of_url(&self, url: &str) -> StoreResult<String> {
        let base = self.base_url.trim_end_matches('/');
        let rest = url.strip_prefix(base).ok_or_else(|| {
            StoreError::InvalidKey(format!("URL not served by this store: {url}"))
        })?;
        let key = rest
            .trim_start_matches('/')
            .split('?')
            .next()
            .unwrap_or_default();
        if key.is_empty() {
            return Err(StoreError::InvalidKey(format!(
                "URL has no object key: {url}"
            )));
        }
        Ok(key.to_string())
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_object(
        &self,
        key: &str,
        data: &Bytes,
        metadata: &PhotoMetadata,
        events: &UnboundedSender<PutEvent>,
    ) -> StoreResult<String> {
        let path = self.key_to_path(key)?;
        let total = data.len() as u64;

        Self::ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StoreError::Backend(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let mut transferred: u64 = 0;
        for chunk in data.chunks(PUT_CHUNK_BYTES) {
            file.write_all(chunk).await.map_err(|e| {
                StoreError::Backend(format!("Failed to write file {}: {}", path.display(), e))
            })?;
            transferred += chunk.len() as u64;
            // A dropped receiver abandons observation only; keep writing.
            let _ = events.send(PutEvent::Progress { transferred, total });
        }

        file.sync_all().await.map_err(|e| {
            StoreError::Backend(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let sidecar = Self::sidecar_path(&path);
        let json = serde_json::to_vec(metadata)
            .map_err(|e| StoreError::Backend(format!("Failed to encode metadata: {e}")))?;
        fs::write(&sidecar, json).await.map_err(|e| {
            StoreError::Backend(format!(
                "Failed to write metadata sidecar {}: {}",
                sidecar.display(),
                e
            ))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = total,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob store put successful"
        );

        Ok(self.url_of(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put_observable(
        &self,
        key: &str,
        data: Bytes,
        metadata: PhotoMetadata,
    ) -> BoxStream<'static, PutEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = self.clone();
        let key = key.to_string();

        tokio::spawn(async move {
            match store.write_object(&key, &data, &metadata, &tx).await {
                Ok(url) => {
                    let _ = tx.send(PutEvent::Done { url });
                }
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "Local blob store put failed");
                    let _ = tx.send(PutEvent::Failed(e));
                }
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }

    async fn url_for(&self, key: &str) -> StoreResult<String> {
        self.key_to_path(key)?;
        Ok(self.url_of(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StoreError::Backend(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        let sidecar = Self::sidecar_path(&path);
        if fs::try_exists(&sidecar).await.unwrap_or(false) {
            let _ = fs::remove_file(&sidecar).await;
        }

        tracing::info!(key = %key, "Local blob store delete successful");

        Ok(())
    }

    async fn metadata(&self, url: &str) -> StoreResult<PhotoMetadata> {
        let key = self.key_of_url(url)?;
        let path = self.key_to_path(&key)?;
        let sidecar = Self::sidecar_path(&path);

        if !fs::try_exists(&sidecar).await.unwrap_or(false) {
            return Err(StoreError::NotFound(key));
        }

        let raw = fs::read(&sidecar).await.map_err(|e| {
            StoreError::Backend(format!(
                "Failed to read metadata sidecar {}: {}",
                sidecar.display(),
                e
            ))
        })?;

        serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Backend(format!("Failed to decode metadata: {e}")))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    fn meta(asset_id: &str) -> PhotoMetadata {
        PhotoMetadata {
            content_type: "image/jpeg".to_string(),
            uploaded_by: "inspector@example.gov".to_string(),
            asset_id: asset_id.to_string(),
            upload_timestamp_ms: 1_700_000_000_000,
            original_filename: "photo.jpg".to_string(),
            file_size: 4,
        }
    }

    async fn store(dir: &tempfile::TempDir) -> LocalBlobStore {
        LocalBlobStore::new(dir.path(), "http://localhost:4000/photos".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_emits_progress_then_done() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let data = Bytes::from(vec![7u8; 600 * 1024]);
        let total = data.len() as u64;
        let mut events = store
            .put_observable("inspections/G-1/1_photo.jpg", data, meta("G-1"))
            .await;

        let mut last_transferred = 0;
        let mut url = None;
        while let Some(event) = events.next().await {
            match event {
                PutEvent::Progress { transferred, total: t } => {
                    assert_eq!(t, total);
                    assert!(transferred >= last_transferred);
                    last_transferred = transferred;
                }
                PutEvent::Done { url: u } => {
                    url = Some(u);
                    break;
                }
                PutEvent::Failed(e) => panic!("put failed: {e}"),
            }
        }

        assert_eq!(last_transferred, total);
        let url = url.expect("terminal Done event");
        assert!(url.ends_with("inspections/G-1/1_photo.jpg"));
        assert!(store.exists("inspections/G-1/1_photo.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let mut events = store
            .put_observable("inspections/G-2/2_a.jpg", Bytes::from_static(b"data"), meta("G-2"))
            .await;
        let mut url = None;
        while let Some(event) = events.next().await {
            if let PutEvent::Done { url: u } = event {
                url = Some(u);
            }
        }

        let fetched = store.metadata(&url.unwrap()).await.unwrap();
        assert_eq!(fetched, meta("G-2"));
    }

    #[tokio::test]
    async fn test_metadata_missing_object() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let result = store
            .metadata("http://localhost:4000/photos/inspections/G-9/none.jpg")
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_metadata_foreign_url() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let result = store.metadata("http://elsewhere/photos/a.jpg").await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        assert!(store.delete("inspections/G-1/none.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let result = store.delete("../../../etc/passwd").await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));

        let result = store.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));

        let result = store.url_for("a/../b").await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_object_and_sidecar() {
        let dir = tempdir().unwrap();
        let store = store(&dir).await;

        let mut events = store
            .put_observable("inspections/G-3/3_b.jpg", Bytes::from_static(b"xy"), meta("G-3"))
            .await;
        let mut url = None;
        while let Some(event) = events.next().await {
            if let PutEvent::Done { url: u } = event {
                url = Some(u);
            }
        }
        let url = url.unwrap();

        store.delete("inspections/G-3/3_b.jpg").await.unwrap();
        assert!(!store.exists("inspections/G-3/3_b.jpg").await.unwrap());
        assert!(store.metadata(&url).await.is_err());
    }
}
