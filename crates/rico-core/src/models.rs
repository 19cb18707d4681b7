//! JSON envelopes exchanged between the client controller and the generation endpoint.

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Body of a generation request.
///
/// Both fields are optional on the wire so the endpoint can answer a missing field
/// with its own 400 message instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Base64 photo payload, without the `data:<type>;base64,` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Scenario key, e.g. `urban-ceo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

impl GenerateRequest {
    pub fn new(image: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            image: Some(image.into()),
            scenario: Some(scenario.key().to_string()),
        }
    }
}

/// Successful generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub image_url: String,
}

impl GenerateResponse {
    pub const SUCCESS_MESSAGE: &'static str = "Image generated successfully";

    pub fn success(image_url: impl Into<String>) -> Self {
        Self {
            status: Some("success".to_string()),
            message: Some(Self::SUCCESS_MESSAGE.to_string()),
            image_url: image_url.into(),
        }
    }

    /// Degraded-mode answer: only the URL, no status or message.
    pub fn placeholder(image_url: impl Into<String>) -> Self {
        Self {
            status: None,
            message: None,
            image_url: image_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_wire_keys() {
        let request = GenerateRequest::new("aGVsbG8=", Scenario::SilentElite);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "image": "aGVsbG8=", "scenario": "silent-elite" })
        );
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let request: GenerateRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.image.is_none());
        assert!(request.scenario.is_none());
    }

    #[test]
    fn response_uses_camel_case_url() {
        let value = serde_json::to_value(GenerateResponse::success("https://x/y.png")).unwrap();
        assert_eq!(value["imageUrl"], "https://x/y.png");
        assert_eq!(value["status"], "success");

        let placeholder = serde_json::to_value(GenerateResponse::placeholder("https://p")).unwrap();
        assert_eq!(placeholder, json!({ "imageUrl": "https://p" }));
    }
}
