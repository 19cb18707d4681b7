//! Gemini (Google) image-to-image provider.

use crate::traits::{GeneratedImage, ImageTransformer, ProviderError, ProviderResult};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Builder for [`GeminiTransformer`].
#[derive(Debug, Clone, Default)]
pub struct GeminiTransformerBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiTransformerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Model identifier, e.g. `gemini-2.5-flash-image`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the API host. Used for proxies and in tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ProviderResult<GeminiTransformer> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::Auth("Gemini API key not provided".into()))?;

        let client = reqwest::Client::builder()
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            )
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GeminiTransformer {
            client,
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Gemini `generateContent` client sending one inline image plus one text instruction
/// and asking for image output only.
pub struct GeminiTransformer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Debug for GeminiTransformer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiTransformer")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiTransformer {
    pub fn builder() -> GeminiTransformerBuilder {
        GeminiTransformerBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn parse_error(&self, status: u16, text: &str) -> ProviderError {
        let text = truncate_message(text);
        match status {
            401 | 403 => ProviderError::Auth(text),
            404 => ProviderError::ModelNotFound(self.model.clone()),
            429 => ProviderError::RateLimited,
            _ => {
                let lower = text.to_lowercase();
                if lower.contains("safety")
                    || lower.contains("blocked")
                    || lower.contains("prohibited")
                {
                    ProviderError::ContentBlocked(text)
                } else {
                    ProviderError::Api {
                        status,
                        message: text,
                    }
                }
            }
        }
    }

    fn extract_image(&self, response: GeminiResponse) -> ProviderResult<Option<GeneratedImage>> {
        if let Some(feedback) = response.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(ProviderError::ContentBlocked(msg));
            }
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Ok(None);
        };

        if let Some(ref finish_reason) = candidate.finish_reason {
            match finish_reason.as_str() {
                "SAFETY"
                | "IMAGE_SAFETY"
                | "IMAGE_PROHIBITED_CONTENT"
                | "PROHIBITED_CONTENT"
                | "RECITATION"
                | "IMAGE_RECITATION"
                | "BLOCKLIST" => {
                    return Err(ProviderError::ContentBlocked(format!(
                        "Content blocked by Gemini safety filter: {}",
                        finish_reason
                    )));
                }
                _ => {}
            }
        }

        let inline_data = candidate
            .content
            .into_iter()
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data);

        let Some(inline_data) = inline_data else {
            tracing::warn!(
                model = %self.model,
                finish_reason = ?candidate.finish_reason,
                "Gemini response contained no image data"
            );
            return Ok(None);
        };

        let data = base64::engine::general_purpose::STANDARD
            .decode(inline_data.data.as_bytes())
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if data.is_empty() {
            return Ok(None);
        }

        Ok(Some(GeneratedImage::new(data, inline_data.mime_type)))
    }
}

#[async_trait]
impl ImageTransformer for GeminiTransformer {
    async fn transform(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> ProviderResult<Option<GeneratedImage>> {
        let start = Instant::now();
        let body = GeminiRequest::new(image, media_type, prompt);

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(
                model = %self.model,
                status = status.as_u16(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Gemini request failed"
            );
            return Err(self.parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let image = self.extract_image(gemini_response)?;

        tracing::info!(
            model = %self.model,
            output_bytes = image.as_ref().map(|img| img.data.len()).unwrap_or(0),
            has_image = image.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Gemini generation completed"
        );

        Ok(image)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn truncate_message(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_ERROR_MESSAGE_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    format!("{}...", truncated)
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn new(image: &[u8], media_type: &str, prompt: &str) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: media_type.to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(image),
                },
            },
            GeminiRequestPart::Text {
                text: prompt.to_string(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}
