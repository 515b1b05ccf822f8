use crate::constants::{ALLOWED_PHOTO_CONTENT_TYPES, MAX_PHOTO_BYTES};
use crate::models::PhotoFile;

/// Validation errors for candidate photo uploads.
///
/// Every variant carries a user-presentable message. Validation is
/// synchronous and runs before any storage activity.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No photo provided for upload")]
    EmptyFile,

    #[error("No asset id provided for upload")]
    MissingAssetId,

    #[error("Invalid file type: {content_type}. Only JPG, PNG, GIF, and WebP images are allowed.")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
}

/// Photo file validator
///
/// Holds the size ceiling and content-type allow-list so validation stays
/// decoupled from storage implementation details.
#[derive(Clone)]
pub struct PhotoValidator {
    max_bytes: u64,
    allowed_content_types: Vec<String>,
}

impl PhotoValidator {
    pub fn new(max_bytes: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_content_types,
        }
    }

    /// Validate the asset association.
    pub fn validate_asset_id(&self, asset_id: &str) -> Result<(), ValidationError> {
        if asset_id.trim().is_empty() {
            return Err(ValidationError::MissingAssetId);
        }
        Ok(())
    }

    /// Validate the payload size against the ceiling.
    pub fn validate_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Validate the declared content type against the allow-list.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();
        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }
        Ok(())
    }

    /// Validate all aspects of a candidate upload.
    pub fn validate(&self, file: &PhotoFile, asset_id: &str) -> Result<(), ValidationError> {
        self.validate_asset_id(asset_id)?;
        self.validate_size(file.size())?;
        self.validate_content_type(&file.content_type)?;
        Ok(())
    }
}

impl Default for PhotoValidator {
    fn default() -> Self {
        Self::new(
            MAX_PHOTO_BYTES,
            ALLOWED_PHOTO_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
        )
    }
}
