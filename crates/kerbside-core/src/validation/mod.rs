//! Validation modules

pub mod photo;

pub use photo::{PhotoValidator, ValidationError};
