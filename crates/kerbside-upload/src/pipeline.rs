use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use kerbside_core::auth::AuthProvider;
use kerbside_core::constants::{CONNECTION_PROBE_KEY, DEFAULT_PHOTO_CATEGORY};
use kerbside_core::models::{PhotoFile, PhotoMetadata};
use kerbside_core::validation::PhotoValidator;
use kerbside_core::Config;
use kerbside_storage::{key_from_url, photo_key, BlobStore, PutEvent};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::UploadError;

/// One event in the life of an upload, as observed by a caller consuming
/// [`PhotoUploader::upload_events`]. Progress percentages are monotonically
/// non-decreasing; exactly one terminal `Succeeded` or `Failed` event is
/// delivered, after all progress.
#[derive(Debug)]
pub enum UploadEvent {
    Progress { percent: u8 },
    Succeeded { url: String },
    Failed { error: UploadError },
}

/// The photo upload pipeline.
///
/// Validates a candidate file, derives its destination key, runs the
/// observable transfer, and classifies failures. Holds no per-upload
/// state; concurrent uploads are independent and uploads for the same
/// asset are deliberately not de-duplicated.
#[derive(Clone)]
pub struct PhotoUploader {
    store: Arc<dyn BlobStore>,
    auth: Arc<dyn AuthProvider>,
    validator: PhotoValidator,
}

impl PhotoUploader {
    pub fn new(store: Arc<dyn BlobStore>, auth: Arc<dyn AuthProvider>) -> Self {
        PhotoUploader {
            store,
            auth,
            validator: PhotoValidator::default(),
        }
    }

    /// Build an uploader with limits taken from configuration.
    pub fn from_config(
        store: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthProvider>,
        config: &Config,
    ) -> Self {
        PhotoUploader {
            store,
            auth,
            validator: PhotoValidator::new(
                config.max_photo_bytes,
                config.allowed_content_types.clone(),
            ),
        }
    }

    /// Upload a photo for an asset and return its reference URL.
    pub async fn upload(
        &self,
        file: PhotoFile,
        asset_id: &str,
        category: &str,
    ) -> Result<String, UploadError> {
        self.upload_with_progress(file, asset_id, category, |_| {})
            .await
    }

    /// Upload under the default inspections category.
    pub async fn upload_inspection(
        &self,
        file: PhotoFile,
        asset_id: &str,
    ) -> Result<String, UploadError> {
        self.upload(file, asset_id, DEFAULT_PHOTO_CATEGORY).await
    }

    /// Upload with a progress observer. The observer sees rounded
    /// percentages in non-decreasing order and is guaranteed a final 100
    /// before the method returns success.
    pub async fn upload_with_progress(
        &self,
        file: PhotoFile,
        asset_id: &str,
        category: &str,
        mut on_progress: impl FnMut(u8),
    ) -> Result<String, UploadError> {
        // Validation fails fast, before any storage activity.
        self.validator.validate(&file, asset_id)?;

        let uploaded_by = self
            .auth
            .current_user()
            .map(|user| user.email)
            .unwrap_or_else(|| "unknown".to_string());
        let timestamp_ms = Utc::now().timestamp_millis();
        let key = photo_key(category, asset_id, timestamp_ms, &file.name);
        let metadata = PhotoMetadata {
            content_type: file.content_type.clone(),
            uploaded_by,
            asset_id: asset_id.to_string(),
            upload_timestamp_ms: timestamp_ms,
            original_filename: file.name.clone(),
            file_size: file.size(),
        };

        tracing::info!(
            asset_id = %asset_id,
            key = %key,
            size_bytes = file.size(),
            "Photo upload started"
        );

        let mut events = self
            .store
            .put_observable(&key, file.bytes, metadata)
            .await;

        let mut last_percent: u8 = 0;
        while let Some(event) = events.next().await {
            match event {
                PutEvent::Progress { transferred, total } => {
                    let percent = percent_of(transferred, total);
                    if percent > last_percent {
                        last_percent = percent;
                        on_progress(percent);
                    }
                }
                PutEvent::Done { url } => {
                    if last_percent < 100 {
                        on_progress(100);
                    }
                    tracing::info!(asset_id = %asset_id, url = %url, "Photo upload succeeded");
                    return Ok(url);
                }
                PutEvent::Failed(err) => {
                    let classified = UploadError::classify(err);
                    tracing::error!(
                        asset_id = %asset_id,
                        key = %key,
                        error = %classified,
                        "Photo upload failed"
                    );
                    return Err(classified);
                }
            }
        }

        // The store contract requires a terminal event; a bare end of
        // stream is a backend defect.
        Err(UploadError::Unknown(
            "storage stream ended without a terminal event".to_string(),
        ))
    }

    /// Upload as a discriminated event stream: zero or more `Progress`
    /// events followed by exactly one `Succeeded` or `Failed`.
    pub fn upload_events(
        &self,
        file: PhotoFile,
        asset_id: String,
        category: String,
    ) -> UnboundedReceiverStream<UploadEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let uploader = self.clone();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = uploader
                .upload_with_progress(file, &asset_id, &category, move |percent| {
                    let _ = progress_tx.send(UploadEvent::Progress { percent });
                })
                .await;

            let terminal = match result {
                Ok(url) => UploadEvent::Succeeded { url },
                Err(error) => UploadEvent::Failed { error },
            };
            let _ = tx.send(terminal);
        });

        UnboundedReceiverStream::new(rx)
    }

    /// Best-effort photo deletion.
    ///
    /// A dangling object is an acceptable degraded state; a failed delete
    /// is logged and never propagated.
    pub async fn delete_photo(&self, photo_url: &str, asset_id: &str, category: &str) {
        if photo_url.is_empty() {
            tracing::debug!("No photo URL provided for deletion");
            return;
        }

        let Some(key) = key_from_url(photo_url, asset_id, category) else {
            tracing::warn!(url = %photo_url, "Could not derive storage key from photo URL");
            return;
        };

        match self.store.delete(&key).await {
            Ok(()) => tracing::info!(key = %key, "Photo deleted"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Photo delete failed"),
        }
    }

    /// Best-effort metadata lookup for a stored photo. Absent when the URL
    /// is invalid or the object is gone.
    pub async fn photo_metadata(&self, photo_url: &str) -> Option<PhotoMetadata> {
        if photo_url.is_empty() {
            return None;
        }

        match self.store.metadata(photo_url).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(url = %photo_url, error = %e, "Photo metadata lookup failed");
                None
            }
        }
    }

    /// Write and delete a small probe object to confirm the blob store is
    /// reachable and authorized. Startup health check, not part of the
    /// upload path.
    pub async fn test_connection(&self) -> bool {
        let probe = PhotoMetadata {
            content_type: "text/plain".to_string(),
            uploaded_by: self
                .auth
                .current_user()
                .map(|user| user.email)
                .unwrap_or_else(|| "unknown".to_string()),
            asset_id: "probe".to_string(),
            upload_timestamp_ms: Utc::now().timestamp_millis(),
            original_filename: CONNECTION_PROBE_KEY.to_string(),
            file_size: 4,
        };

        let mut events = self
            .store
            .put_observable(CONNECTION_PROBE_KEY, Bytes::from_static(b"test"), probe)
            .await;

        let reachable = loop {
            match events.next().await {
                Some(PutEvent::Done { .. }) => break true,
                Some(PutEvent::Failed(e)) => {
                    tracing::warn!(error = %e, "Blob store connection test failed");
                    break false;
                }
                Some(PutEvent::Progress { .. }) => continue,
                None => break false,
            }
        };

        if reachable {
            if let Err(e) = self.store.delete(CONNECTION_PROBE_KEY).await {
                tracing::debug!(error = %e, "Probe object cleanup failed");
            }
            tracing::info!("Blob store connection test successful");
        }

        reachable
    }
}

/// Rounded transfer percentage, clamped to [0, 100].
fn percent_of(transferred: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (transferred as f64 / total as f64 * 100.0).round() as u64;
    percent.min(100) as u8
}
