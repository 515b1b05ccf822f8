use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A candidate image file handed to the upload pipeline: raw payload plus
/// the declared media type and original filename.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        PhotoFile {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Audit metadata attached to a stored photo object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub content_type: String,
    pub uploaded_by: String,
    pub asset_id: String,
    pub upload_timestamp_ms: i64,
    pub original_filename: String,
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_file_size() {
        let file = PhotoFile::new("a.jpg", "image/jpeg", Bytes::from_static(b"abc"));
        assert_eq!(file.size(), 3);
    }
}
