//! Blob-store collaborator contract and backends.
//!
//! The upload pipeline talks to durable storage exclusively through the
//! [`BlobStore`] trait: an observable put (progress events ending in exactly
//! one terminal), reference-URL resolution, delete, and metadata lookup.
//! `LocalBlobStore` is the filesystem backend used by tests and single-node
//! deployments; hosted backends implement the same trait out of tree.
//!
//! **Key format:** photo objects live under
//! `{category}/{asset_id}/{timestamp_ms}_{sanitized_filename}` — see
//! [`keys::photo_key`].

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{key_from_url, photo_key, sanitize_filename};
pub use local::LocalBlobStore;
pub use traits::{BlobStore, PutEvent, StoreError, StoreResult};
