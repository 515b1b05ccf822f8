//! Application-wide constants.

/// Byte ceiling for a single photo upload (10 MiB).
pub const MAX_PHOTO_BYTES: u64 = 10 * 1024 * 1024;

/// Content types accepted by the photo upload pipeline.
pub const ALLOWED_PHOTO_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Default storage category for inspection photos.
pub const DEFAULT_PHOTO_CATEGORY: &str = "inspections";

/// Object key written and deleted by the storage connection probe.
pub const CONNECTION_PROBE_KEY: &str = "test-connection";
