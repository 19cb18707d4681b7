//! Image provider setup

use anyhow::{Context, Result};
use rico_core::{Config, GenerationMode};
use rico_providers::{GeminiTransformer, ImageTransformer};
use std::sync::Arc;
use std::time::Duration;

/// Build the image provider, or `None` when running in placeholder mode.
pub fn setup_provider(config: &Config) -> Result<Option<Arc<dyn ImageTransformer>>> {
    let Some(api_key) = config.gemini_api_key.as_deref() else {
        tracing::warn!(
            mode = GenerationMode::Placeholder.as_str(),
            placeholder_base_url = %config.placeholder_base_url,
            "GEMINI_API_KEY not set, serving placeholder images instead of generating"
        );
        return Ok(None);
    };

    let transformer = GeminiTransformer::builder()
        .api_key(api_key)
        .model(config.gemini_model.clone())
        .base_url(config.gemini_base_url.clone())
        .timeout(Duration::from_secs(config.gemini_timeout_secs))
        .build()
        .context("Failed to create Gemini provider")?;

    tracing::info!(
        mode = GenerationMode::Live.as_str(),
        model = %transformer.model(),
        timeout_secs = config.gemini_timeout_secs,
        "Image provider initialized"
    );

    Ok(Some(Arc::new(transformer)))
}
