//! Rico Providers Library
//!
//! Image-to-image generation providers. The endpoint only depends on the
//! [`ImageTransformer`] trait; each provider implementation lives behind its own feature.

#[cfg(feature = "provider-gemini")]
pub mod gemini;
pub mod traits;

#[cfg(feature = "provider-gemini")]
pub use gemini::{GeminiTransformer, GeminiTransformerBuilder};
pub use traits::{GeneratedImage, ImageTransformer, ProviderError, ProviderResult};
