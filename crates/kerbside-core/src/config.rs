//! Configuration module
//!
//! Environment-driven configuration for storage and upload limits.

use std::env;

use crate::constants::{ALLOWED_PHOTO_CONTENT_TYPES, MAX_PHOTO_BYTES};

const DEFAULT_STORAGE_ROOT: &str = "./data/photos";
const DEFAULT_STORAGE_BASE_URL: &str = "http://localhost:4000/photos";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    /// Root directory for the local blob store backend.
    pub storage_root: String,
    /// Base URL the local backend serves objects from.
    pub storage_base_url: String,
    pub max_photo_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_root =
            env::var("KERBSIDE_STORAGE_ROOT").unwrap_or_else(|_| DEFAULT_STORAGE_ROOT.to_string());

        let storage_base_url = env::var("KERBSIDE_STORAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string());

        let max_photo_bytes = match env::var("KERBSIDE_MAX_PHOTO_MB") {
            Ok(raw) => {
                let mb: u64 = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("KERBSIDE_MAX_PHOTO_MB must be a valid number"))?;
                mb * 1024 * 1024
            }
            Err(_) => MAX_PHOTO_BYTES,
        };

        let allowed_content_types = env::var("KERBSIDE_ALLOWED_CONTENT_TYPES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                ALLOWED_PHOTO_CONTENT_TYPES
                    .iter()
                    .map(|ct| ct.to_string())
                    .collect()
            });

        Ok(Config {
            environment,
            storage_root,
            storage_base_url,
            max_photo_bytes,
            allowed_content_types,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Scoped to variables this test does not set; from_env falls back.
        let config = Config::from_env().unwrap();
        assert_eq!(config.max_photo_bytes % (1024 * 1024), 0);
        assert!(!config.allowed_content_types.is_empty());
    }

    #[test]
    fn test_is_production() {
        let mut config = Config::from_env().unwrap();
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "development".to_string();
        assert!(!config.is_production());
    }
}
