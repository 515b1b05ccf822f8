//! Storage abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must
//! implement, together with the failure classes the upload pipeline maps
//! into its user-facing taxonomy.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use kerbside_core::models::PhotoMetadata;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Permission denied by storage backend: {0}")]
    Unauthorized(String),

    #[error("Transfer canceled: {0}")]
    Canceled(String),

    #[error("Checksum mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("Retry limit exceeded: {0}")]
    RetryLimitExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Cross-origin request blocked: {0}")]
    Cors(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Events emitted by an observable put.
#[derive(Debug)]
pub enum PutEvent {
    Progress { transferred: u64, total: u64 },
    Done { url: String },
    Failed(StoreError),
}

/// Storage abstraction trait
///
/// All blob-store backends must implement this trait. The put operation is
/// observable: the returned stream yields zero or more `Progress` events
/// followed by exactly one terminal `Done` or `Failed` event. Dropping the
/// stream abandons observation only; the underlying transfer may still
/// complete.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an object under `key` with audit metadata attached, reporting
    /// transfer progress.
    async fn put_observable(
        &self,
        key: &str,
        data: Bytes,
        metadata: PhotoMetadata,
    ) -> BoxStream<'static, PutEvent>;

    /// Stable reference URL for a stored object.
    async fn url_for(&self, key: &str) -> StoreResult<String>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Audit metadata for the object a reference URL points at.
    async fn metadata(&self, url: &str) -> StoreResult<PhotoMetadata>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StoreResult<bool>;
}
