//! HTTP client for the rich-image generation endpoint.
//!
//! [`ApiClient`] performs the single POST of a generation request. [`ClientController`]
//! owns the user-facing state around it (selected photo, scenario, loading flag and the
//! success or error summary) and reports progress through a [`Notifier`].

pub mod controller;
pub mod error;
pub mod notifier;

pub use controller::{ClientController, GenerationPhase, PhotoFile};
pub use error::{ClientError, ClientResult};
pub use notifier::{Notification, NotificationId, Notifier, RecordingNotifier};

use reqwest::{Client, StatusCode};
use rico_core::GenerateRequest;
use std::time::Duration;

/// Default endpoint when `RICO_ENDPOINT_URL` is not set.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:4000/generate-rich-image";

/// Generation can take well over a minute on the provider side.
const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Authentication strategy for the endpoint.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credential header.
    Anonymous,
}

/// Status and body of an endpoint response, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client for the generation endpoint.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    endpoint_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(endpoint_url: impl Into<String>, auth: Auth) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
            auth,
        })
    }

    /// Create client from environment: `RICO_ENDPOINT_URL` and `RICO_API_KEY` (Bearer token).
    pub fn from_env() -> ClientResult<Self> {
        let endpoint_url = std::env::var("RICO_ENDPOINT_URL")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT_URL.to_string());

        let auth = std::env::var("RICO_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Auth::Bearer)
            .unwrap_or(Auth::Anonymous);

        Self::new(endpoint_url, auth)
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::Anonymous => request,
        }
    }

    /// POST one generation request. Any HTTP status is returned as-is; only failures to
    /// send the request or read the body are errors.
    pub async fn post_generation(&self, request: &GenerateRequest) -> ClientResult<RawResponse> {
        let builder = self.client.post(&self.endpoint_url).json(request);
        let builder = self.apply_auth(builder);

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }

    /// Download a generated image.
    pub async fn download(&self, url: &str) -> ClientResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to download image: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Application(format!(
                "Image download failed with status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read image: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
