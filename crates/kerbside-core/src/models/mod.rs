//! Domain models shared across Kerbside components.

pub mod asset;
pub mod photo;

pub use asset::{AssetLayer, AssetStatus, Position, StoredAsset};
pub use photo::{PhotoFile, PhotoMetadata};
