use kerbside_core::validation::ValidationError;
use kerbside_storage::StoreError;

/// Classified upload failure. `upload` rejects with exactly one of these
/// per attempt; each variant renders a single user-presentable message.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Photo upload failed. Permission denied. Please check your authentication.")]
    Authorization,

    #[error("Photo upload failed. Upload was canceled.")]
    Canceled,

    #[error("Photo upload failed. File corruption detected. Please try uploading again.")]
    Integrity,

    #[error("Photo upload failed. Network error. Please check your connection and try again.")]
    Transport,

    #[error("Photo upload failed. {0}")]
    Unknown(String),
}

impl UploadError {
    /// Map a blob-store failure into the user-facing taxonomy.
    pub(crate) fn classify(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized(_) => UploadError::Authorization,
            StoreError::Canceled(_) => UploadError::Canceled,
            StoreError::ChecksumMismatch(_) => UploadError::Integrity,
            StoreError::Network(_)
            | StoreError::Cors(_)
            | StoreError::RetryLimitExceeded(_) => UploadError::Transport,
            other => UploadError::Unknown(other.to_string()),
        }
    }

    /// Whether a manual retry is worth suggesting to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::Transport | UploadError::Integrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(matches!(
            UploadError::classify(StoreError::Unauthorized("rule".into())),
            UploadError::Authorization
        ));
        assert!(matches!(
            UploadError::classify(StoreError::ChecksumMismatch("bad".into())),
            UploadError::Integrity
        ));
        assert!(matches!(
            UploadError::classify(StoreError::Network("offline".into())),
            UploadError::Transport
        ));
        assert!(matches!(
            UploadError::classify(StoreError::Cors("blocked".into())),
            UploadError::Transport
        ));
        assert!(matches!(
            UploadError::classify(StoreError::RetryLimitExceeded("gave up".into())),
            UploadError::Transport
        ));
        assert!(matches!(
            UploadError::classify(StoreError::Canceled("user".into())),
            UploadError::Canceled
        ));
        assert!(matches!(
            UploadError::classify(StoreError::Backend("boom".into())),
            UploadError::Unknown(_)
        ));
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            UploadError::Authorization.to_string(),
            UploadError::Canceled.to_string(),
            UploadError::Integrity.to_string(),
            UploadError::Transport.to_string(),
            UploadError::Unknown("backend exploded".to_string()).to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_retry_suggestion() {
        assert!(UploadError::Transport.is_retryable());
        assert!(UploadError::Integrity.is_retryable());
        assert!(!UploadError::Authorization.is_retryable());
    }
}
