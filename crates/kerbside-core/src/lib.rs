//! Kerbside Core Library
//!
//! This crate provides the domain models, photo validation, configuration,
//! and collaborator contracts shared across all Kerbside components.

pub mod auth;
pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use auth::{AuthError, AuthProvider, FixedAuth, Role, UserIdentity};
pub use config::Config;
pub use models::{AssetLayer, AssetStatus, PhotoFile, PhotoMetadata, Position, StoredAsset};
pub use validation::{PhotoValidator, ValidationError};
