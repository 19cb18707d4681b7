//! Client-side generation flow: photo and scenario selection, one request per
//! `generate()` call, and the resulting success or error summary.

use crate::error::{ClientError, ClientResult};
use crate::notifier::Notifier;
use crate::{ApiClient, RawResponse};
use base64::Engine;
use rico_core::{GenerateRequest, Scenario};
use serde_json::{json, Value};

const MSG_INVALID_FILE: &str = "Please upload a valid image file.";
const MSG_NO_PHOTO: &str = "Please upload a photo first.";
const MSG_IN_PROGRESS: &str = "Creating your high-level version...";
const MSG_ALREADY_RUNNING: &str = "A generation is already in progress.";
const MSG_INVALID_RESPONSE: &str = "Invalid response from the image generation function.";
const MSG_DEFAULT_SUCCESS: &str = "Your rich version is ready!";
const RAW_PREVIEW_CHARS: usize = 200;

/// A file picked by the user.
#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// `data:<media type>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Where the controller is in the generation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// State machine behind the upload-and-generate screen.
pub struct ClientController<N: Notifier> {
    client: ApiClient,
    notifier: N,
    photo: Option<String>,
    scenario: Scenario,
    phase: GenerationPhase,
    image_url: Option<String>,
    dialog_open: bool,
    response_summary: Option<String>,
    error_summary: Option<String>,
}

impl<N: Notifier> ClientController<N> {
    pub fn new(client: ApiClient, notifier: N) -> Self {
        Self {
            client,
            notifier,
            photo: None,
            scenario: Scenario::default(),
            phase: GenerationPhase::Idle,
            image_url: None,
            dialog_open: false,
            response_summary: None,
            error_summary: None,
        }
    }

    /// Replace the current photo. Non-image files clear the selection and are rejected
    /// without reading further.
    pub fn select_photo(&mut self, file: PhotoFile) -> ClientResult<()> {
        if !file.is_image() {
            tracing::debug!(name = %file.name, media_type = %file.media_type, "Rejected non-image file");
            self.photo = None;
            self.notifier.error(MSG_INVALID_FILE);
            return Err(ClientError::Validation(MSG_INVALID_FILE.to_string()));
        }

        self.photo = Some(file.to_data_url());
        Ok(())
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    pub fn select_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Selected photo as a data URL.
    pub fn photo_data_url(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == GenerationPhase::Loading
    }

    /// Whether the generate trigger is enabled.
    pub fn can_generate(&self) -> bool {
        !self.is_loading() && self.photo.is_some()
    }

    pub fn generated_image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Whether the full-size result view is open.
    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// Pretty-printed body of the last successful response.
    pub fn response_summary(&self) -> Option<&str> {
        self.response_summary.as_deref()
    }

    /// Detailed message of the last failure.
    pub fn error_summary(&self) -> Option<&str> {
        self.error_summary.as_deref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Leave a `Loading` phase whose `generate()` future was dropped before completing.
    pub fn reset(&mut self) {
        if self.is_loading() {
            self.phase = GenerationPhase::Idle;
        }
    }

    /// Send the selected photo and scenario to the endpoint, exactly once.
    ///
    /// Returns the generated image URL. Every failure is recorded as the error summary
    /// and shown as an error notification; the loading state is cleared on every path.
    pub async fn generate(&mut self) -> ClientResult<String> {
        if self.is_loading() {
            return Err(ClientError::Validation(MSG_ALREADY_RUNNING.to_string()));
        }

        let Some(photo) = self.photo.as_deref() else {
            self.notifier.error(MSG_NO_PHOTO);
            return Err(ClientError::Validation(MSG_NO_PHOTO.to_string()));
        };

        let payload = strip_data_url_prefix(photo).to_string();
        let request = GenerateRequest::new(payload, self.scenario);

        self.phase = GenerationPhase::Loading;
        self.response_summary = None;
        self.error_summary = None;
        self.image_url = None;
        self.dialog_open = false;
        let loading_id = self.notifier.loading(MSG_IN_PROGRESS);

        let outcome = match self.client.post_generation(&request).await {
            Ok(response) => interpret_response(response),
            Err(err) => Err(err),
        };

        self.notifier.dismiss(loading_id);

        match outcome {
            Ok(success) => {
                tracing::info!(image_url = %success.image_url, scenario = %self.scenario, "Generation succeeded");
                self.image_url = Some(success.image_url.clone());
                self.dialog_open = true;
                self.response_summary = Some(success.summary);
                self.phase = GenerationPhase::Success;
                self.notifier.success(&success.message);
                Ok(success.image_url)
            }
            Err(err) => {
                tracing::error!(error = %err, scenario = %self.scenario, "Generation failed");
                self.error_summary = Some(err.to_string());
                self.phase = GenerationPhase::Failure;
                self.notifier
                    .error(&format!("Generation failed: {}", err));
                Err(err)
            }
        }
    }
}

struct GenerationSuccess {
    image_url: String,
    message: String,
    summary: String,
}

/// Base64 payload of a data URL; input without a prefix is returned unchanged.
fn strip_data_url_prefix(data_url: &str) -> &str {
    match data_url.split_once(',') {
        Some((_, payload)) => payload,
        None => data_url,
    }
}

fn interpret_response(response: RawResponse) -> ClientResult<GenerationSuccess> {
    let RawResponse { status, body } = response;

    if !status.is_success() {
        let error_body = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| {
            let preview: String = body.chars().take(RAW_PREVIEW_CHARS).collect();
            json!({ "message": format!("{}...", preview), "raw_response": body })
        });
        return Err(ClientError::Transport(format!(
            "HTTP {} ({}): {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            pretty(&error_body)
        )));
    }

    let data: Value = serde_json::from_str(&body)
        .map_err(|e| ClientError::Transport(format!("Failed to parse response as JSON: {}", e)))?;

    if let Some(error) = data.get("error").filter(|v| is_truthy(v)) {
        let error = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ClientError::Application(format!(
            "Edge function error: {}",
            error
        )));
    }

    let image_url = data
        .get("imageUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ClientError::Application(MSG_INVALID_RESPONSE.to_string()))?;

    let message = data
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(MSG_DEFAULT_SUCCESS);

    Ok(GenerationSuccess {
        image_url: image_url.to_string(),
        message: message.to_string(),
        summary: pretty(&data),
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{Notification, RecordingNotifier};
    use crate::Auth;
    use mockito::{Matcher, Server, ServerGuard};

    fn controller(server: &ServerGuard) -> ClientController<RecordingNotifier> {
        let client = ApiClient::new(
            format!("{}/generate-rich-image", server.url()),
            Auth::Bearer("anon-key".to_string()),
        )
        .unwrap();
        ClientController::new(client, RecordingNotifier::new())
    }

    fn jpeg() -> PhotoFile {
        PhotoFile::new("me.jpg", "image/jpeg", b"fake-jpeg".to_vec())
    }

    fn assert_settled(controller: &ClientController<RecordingNotifier>) {
        assert!(!controller.is_loading());
        assert!(controller.notifier().active_loading().is_empty());
    }

    #[tokio::test]
    async fn test_non_image_file_is_rejected_and_clears_photo() {
        let server = Server::new_async().await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        for media_type in ["application/pdf", "text/plain", "video/mp4", ""] {
            let result = controller.select_photo(PhotoFile::new("x", media_type, vec![1, 2]));
            assert!(matches!(result, Err(ClientError::Validation(_))));
            assert!(controller.photo_data_url().is_none());
            assert!(!controller.can_generate());
        }
        assert_eq!(controller.notifier().errors().len(), 4);
    }

    #[tokio::test]
    async fn test_select_photo_encodes_data_url() {
        let server = Server::new_async().await;
        let mut controller = controller(&server);

        controller.select_photo(jpeg()).unwrap();

        assert_eq!(
            controller.photo_data_url(),
            Some("data:image/jpeg;base64,ZmFrZS1qcGVn")
        );
        assert!(controller.can_generate());
        assert_eq!(controller.scenario(), Scenario::UrbanCeo);
    }

    #[tokio::test]
    async fn test_generate_without_photo_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mut controller = controller(&server);

        let result = controller.generate().await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(controller.notifier().errors(), vec![MSG_NO_PHOTO.to_string()]);
        assert_eq!(controller.phase(), GenerationPhase::Idle);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_success_opens_dialog_and_keeps_summary() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/generate-rich-image")
            .match_header("authorization", "Bearer anon-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "image": "ZmFrZS1qcGVn",
                "scenario": "silent-elite"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success","message":"Image generated successfully","imageUrl":"https://cdn.example/rich-image-1.png"}"#)
            .expect(1)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();
        controller.select_scenario(Scenario::SilentElite);

        let url = controller.generate().await.unwrap();

        mock.assert_async().await;
        assert_eq!(url, "https://cdn.example/rich-image-1.png");
        assert_eq!(controller.phase(), GenerationPhase::Success);
        assert_eq!(controller.generated_image_url(), Some(url.as_str()));
        assert!(controller.dialog_open());
        assert!(controller
            .response_summary()
            .unwrap()
            .contains("\"imageUrl\": \"https://cdn.example/rich-image-1.png\""));
        assert!(controller.error_summary().is_none());
        assert_eq!(
            controller.notifier().successes(),
            vec!["Image generated successfully".to_string()]
        );
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_success_without_message_uses_fallback_text() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/generate-rich-image")
            .with_status(200)
            .with_body(r#"{"imageUrl":"https://picsum.photos/seed/urban-ceo/800/600"}"#)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        controller.generate().await.unwrap();

        assert_eq!(
            controller.notifier().successes(),
            vec![MSG_DEFAULT_SUCCESS.to_string()]
        );
    }

    #[tokio::test]
    async fn test_http_error_with_json_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/generate-rich-image")
            .with_status(500)
            .with_body(r#"{"error":"Image generation failed"}"#)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        let err = controller.generate().await.unwrap_err();

        let expected = format!(
            "HTTP 500 (Internal Server Error): {}",
            serde_json::to_string_pretty(&json!({ "error": "Image generation failed" })).unwrap()
        );
        assert_eq!(err, ClientError::Transport(expected.clone()));
        assert_eq!(controller.error_summary(), Some(expected.as_str()));
        assert_eq!(controller.phase(), GenerationPhase::Failure);
        assert!(controller.response_summary().is_none());
        assert!(controller.notifier().successes().is_empty());
        assert_eq!(controller.notifier().errors().len(), 1);
        assert!(!controller.dialog_open());
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_http_error_with_non_json_body_is_wrapped() {
        let html = format!("<html>{}</html>", "x".repeat(300));
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/generate-rich-image")
            .with_status(502)
            .with_body(&html)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        let err = controller.generate().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        let message = err.to_string();
        assert!(message.starts_with("HTTP 502 (Bad Gateway): {"));
        let body: Value =
            serde_json::from_str(message.split_once(": ").unwrap().1).unwrap();
        let preview: String = html.chars().take(200).collect();
        assert_eq!(body["message"], format!("{}...", preview));
        assert_eq!(body["raw_response"], html);
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_application_error_in_success_status() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/generate-rich-image")
            .with_status(200)
            .with_body(r#"{"error":"quota exceeded","imageUrl":"https://ignored"}"#)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        let err = controller.generate().await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Application("Edge function error: quota exceeded".to_string())
        );
        assert!(controller.generated_image_url().is_none());
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_success_status_without_image_url_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/generate-rich-image")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();

        let err = controller.generate().await.unwrap_err();

        assert_eq!(err, ClientError::Application(MSG_INVALID_RESPONSE.to_string()));
        assert_eq!(controller.error_summary(), Some(MSG_INVALID_RESPONSE));
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let client = ApiClient::new("http://127.0.0.1:1/generate-rich-image", Auth::Anonymous)
            .unwrap();
        let mut controller = ClientController::new(client, RecordingNotifier::new());
        controller.select_photo(jpeg()).unwrap();

        let err = controller.generate().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(controller.phase(), GenerationPhase::Failure);
        assert!(controller.error_summary().is_some());
        assert_settled(&controller);
    }

    #[tokio::test]
    async fn test_new_attempt_clears_previous_summary() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("POST", "/generate-rich-image")
            .with_status(500)
            .with_body(r#"{"error":"boom"}"#)
            .expect(1)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();
        controller.generate().await.unwrap_err();
        failing.remove_async().await;

        server
            .mock("POST", "/generate-rich-image")
            .with_status(200)
            .with_body(r#"{"imageUrl":"https://cdn.example/rich-image-2.png"}"#)
            .create_async()
            .await;
        controller.generate().await.unwrap();

        assert!(controller.error_summary().is_none());
        assert!(controller.response_summary().is_some());

        let events = controller.notifier().events();
        assert!(matches!(events.last(), Some(Notification::Success(_))));
    }

    #[tokio::test]
    async fn test_failure_after_success_clears_previous_result() {
        let mut server = Server::new_async().await;
        let succeeding = server
            .mock("POST", "/generate-rich-image")
            .with_status(200)
            .with_body(r#"{"imageUrl":"https://cdn.example/old.png","message":"done"}"#)
            .expect(1)
            .create_async()
            .await;
        let mut controller = controller(&server);
        controller.select_photo(jpeg()).unwrap();
        controller.generate().await.unwrap();
        assert!(controller.dialog_open());
        succeeding.remove_async().await;

        server
            .mock("POST", "/generate-rich-image")
            .with_status(500)
            .with_body(r#"{"error":"provider API error: 503 - model overloaded"}"#)
            .create_async()
            .await;
        controller.generate().await.unwrap_err();

        assert_eq!(controller.phase(), GenerationPhase::Failure);
        assert!(controller.error_summary().is_some());
        assert!(controller.generated_image_url().is_none());
        assert!(!controller.dialog_open());
        assert!(controller.response_summary().is_none());
        assert_settled(&controller);
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
    }
}
