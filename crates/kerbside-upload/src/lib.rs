//! Photo Upload Pipeline
//!
//! Turns a local image file plus an asset association into a durably
//! stored, retrievable object, or a well-classified failure: synchronous
//! validation, deterministic key derivation, an observable transfer with
//! monotone progress, and exactly one terminal outcome per attempt.

pub mod error;
pub mod pipeline;

pub use error::UploadError;
pub use pipeline::{PhotoUploader, UploadEvent};
