//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use rico_core::{Config, StorageBackend};

/// Validate critical configuration values
///
/// Runs the structural checks of [`Config::validate`] and adds deployment checks that
/// only matter for the HTTP service.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    for (name, url) in [
        ("GEMINI_BASE_URL", &config.gemini_base_url),
        ("PLACEHOLDER_BASE_URL", &config.placeholder_base_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
        }
    }

    if config.cors_allow_headers.is_empty() {
        return Err(anyhow::anyhow!("CORS_ALLOW_HEADERS cannot be empty"));
    }

    if config.is_production() {
        if config.gemini_api_key.is_none() {
            tracing::warn!(
                "Production mode without GEMINI_API_KEY - every request gets a placeholder image"
            );
        }
        if config.storage_backend == StorageBackend::Local
            && config.local_storage_base_url.is_none()
        {
            tracing::warn!(
                "Local storage in production without LOCAL_STORAGE_BASE_URL - image URLs will point at localhost"
            );
        }
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
