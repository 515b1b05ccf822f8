//! Persisted asset catalog.
//!
//! Callers combine registry state with an upload result into a
//! [`StoredAsset`] and persist it here. The catalog also provides
//! timestamped backup snapshots and JSON export/import of the full record
//! set.

use std::sync::Arc;

use chrono::Utc;
use kerbside_core::models::StoredAsset;
use serde_json::json;

use crate::datastore::{server_timestamp, Datastore, DatastoreError};

const ASSETS_PATH: &str = "assets";
const BACKUPS_PATH: &str = "backups";

pub struct AssetCatalog {
    store: Arc<dyn Datastore>,
}

impl AssetCatalog {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        AssetCatalog { store }
    }

    pub async fn save(&self, asset: &StoredAsset) -> Result<(), DatastoreError> {
        let value = serde_json::to_value(asset)?;
        self.store
            .write(&format!("{ASSETS_PATH}/{}", asset.id), value)
            .await?;
        tracing::info!(asset_id = %asset.id, "Asset record saved");
        Ok(())
    }

    pub async fn load(&self, id: &str) -> Result<Option<StoredAsset>, DatastoreError> {
        match self.store.read(&format!("{ASSETS_PATH}/{id}")).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn load_all(&self) -> Result<Vec<StoredAsset>, DatastoreError> {
        let children = self.store.read_children(ASSETS_PATH).await?;
        let mut assets = Vec::with_capacity(children.len());
        for (_, value) in children {
            assets.push(serde_json::from_value(value)?);
        }
        Ok(assets)
    }

    pub async fn remove(&self, id: &str) -> Result<(), DatastoreError> {
        self.store.remove(&format!("{ASSETS_PATH}/{id}")).await?;
        tracing::info!(asset_id = %id, "Asset record removed");
        Ok(())
    }

    /// Snapshot every record under a timestamped backup path. Returns the
    /// path written.
    pub async fn backup(&self) -> Result<String, DatastoreError> {
        let assets = self.load_all().await?;
        let count = assets.len();
        let path = format!("{BACKUPS_PATH}/{}", Utc::now().timestamp_millis());

        let snapshot = json!({
            "written_at": server_timestamp(),
            "assets": serde_json::to_value(&assets)?,
        });
        self.store.write(&path, snapshot).await?;

        tracing::info!(path = %path, records = count, "Backup snapshot written");
        Ok(path)
    }

    /// Restore the most recent backup into the live record set. Returns
    /// the restored records, or `None` when no backup exists.
    pub async fn restore_latest(&self) -> Result<Option<Vec<StoredAsset>>, DatastoreError> {
        let backups = self.store.read_children(BACKUPS_PATH).await?;
        let Some((key, snapshot)) = backups
            .into_iter()
            .max_by_key(|(key, _)| key.parse::<i64>().unwrap_or(0))
        else {
            return Ok(None);
        };

        let assets_value = snapshot.get("assets").cloned().ok_or_else(|| {
            DatastoreError::Backend(format!("backup {key} has no assets payload"))
        })?;
        let assets: Vec<StoredAsset> = serde_json::from_value(assets_value)?;

        self.store.remove(ASSETS_PATH).await?;
        for asset in &assets {
            self.save(asset).await?;
        }

        tracing::info!(backup = %key, records = assets.len(), "Backup restored");
        Ok(Some(assets))
    }

    /// Serialize records for file export.
    pub fn export_json(assets: &[StoredAsset]) -> Result<String, DatastoreError> {
        Ok(serde_json::to_string_pretty(assets)?)
    }

    /// Parse records from an export file.
    pub fn import_json(raw: &str) -> Result<Vec<StoredAsset>, DatastoreError> {
        Ok(serde_json::from_str(raw)?)
    }
}
