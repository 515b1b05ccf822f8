//! Kerbside Services Layer
//!
//! Glue services around the registry and upload pipeline: the datastore
//! collaborator contract with an in-memory implementation, the persisted
//! asset catalog (save/load/backup/restore/export/import), and the
//! loading-indicator decorator for long-running UI actions.

pub mod catalog;
pub mod datastore;
pub mod loading;

pub use catalog::AssetCatalog;
pub use datastore::{server_timestamp, Datastore, DatastoreError, MemoryDatastore};
pub use loading::{with_loading, LoadingIndicator, TracingIndicator};
