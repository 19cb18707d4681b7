//! Provider abstraction trait

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while calling an image provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("rate limited by provider")]
    RateLimited,

    /// Prompt or output blocked by the provider's safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    #[error("provider API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "provider-gemini")]
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode provider output: {0}")]
    Decode(String),

    #[error("provider configuration error: {0}")]
    Config(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Image bytes produced by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }
}

/// Transforms an input photo according to a text instruction.
///
/// `Ok(None)` means the provider answered without producing an image; callers treat
/// that as a generation failure rather than a transport error.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    async fn transform(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> ProviderResult<Option<GeneratedImage>>;

    /// Short provider name for logs and health output
    fn name(&self) -> &'static str;
}
