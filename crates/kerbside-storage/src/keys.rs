//! Shared key derivation for storage backends.
//!
//! Key format: `{category}/{asset_id}/{timestamp_ms}_{sanitized_filename}`.
//! The timestamp prefix keeps uploads from the same instant apart per asset;
//! the asset id segment preserves traceability back to the originating
//! record.

/// Replace every character outside `[A-Za-z0-9.-]` with `_`, so the
/// original filename is safe to embed in a storage path.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the destination key for an inspection photo.
///
/// Deterministic: the same (category, asset id, timestamp, name) always
/// produces the same key.
pub fn photo_key(category: &str, asset_id: &str, timestamp_ms: i64, original_name: &str) -> String {
    format!(
        "{}/{}/{}_{}",
        category,
        asset_id,
        timestamp_ms,
        sanitize_filename(original_name)
    )
}

/// Recover the storage key an upload landed under from its reference URL:
/// the object filename is the URL's last path segment with any query string
/// stripped.
pub fn key_from_url(url: &str, asset_id: &str, category: &str) -> Option<String> {
    let last_segment = url.rsplit('/').next()?;
    let file_name = last_segment.split('?').next()?;
    if file_name.is_empty() {
        return None;
    }
    Some(format!("{}/{}/{}", category, asset_id, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("site photo (1).jpg"), "site_photo__1_.jpg");
        assert_eq!(sanitize_filename("already-safe.PNG"), "already-safe.PNG");
        assert_eq!(sanitize_filename("über.png"), "_ber.png");
    }

    #[test]
    fn test_photo_key_is_deterministic() {
        let a = photo_key("inspections", "G-100", 1_700_000_000_000, "photo.jpg");
        let b = photo_key("inspections", "G-100", 1_700_000_000_000, "photo.jpg");
        assert_eq!(a, b);
        assert_eq!(a, "inspections/G-100/1700000000000_photo.jpg");
    }

    #[test]
    fn test_photo_keys_differ_by_timestamp() {
        let a = photo_key("inspections", "G-100", 1_700_000_000_000, "photo.jpg");
        let b = photo_key("inspections", "G-100", 1_700_000_000_001, "photo.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_from_url_strips_query() {
        let key = key_from_url(
            "http://localhost:4000/photos/inspections/G-1/17_a.jpg?token=abc",
            "G-1",
            "inspections",
        );
        assert_eq!(key.as_deref(), Some("inspections/G-1/17_a.jpg"));
    }

    #[test]
    fn test_key_from_url_rejects_empty_segment() {
        assert_eq!(key_from_url("http://host/path/", "G-1", "inspections"), None);
    }
}
