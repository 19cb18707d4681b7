#![allow(dead_code)]

//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p rico-api`. Storage is a local backend in a
//! temp directory; the image provider is replaced by [`FakeTransformer`].

use async_trait::async_trait;
use axum_test::TestServer;
use rico_api::setup::routes;
use rico_api::state::AppState;
use rico_core::Config;
use rico_providers::{GeneratedImage, ImageTransformer, ProviderError, ProviderResult};
use rico_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Base URL the test storage hands out; the router serves the same files under `/media`.
pub const MEDIA_BASE_URL: &str = "http://localhost:4000/media";

/// 1x1 transparent PNG, used as fake provider output.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Base64 of the bytes `fake-jpeg`, a valid request payload.
pub const PHOTO_BASE64: &str = "ZmFrZS1qcGVn";

/// What the fake provider does when called.
#[derive(Clone)]
pub enum FakeOutcome {
    Image(GeneratedImage),
    NoImage,
    Error(String),
    Panic,
}

/// Records every call and answers with a fixed outcome.
pub struct FakeTransformer {
    outcome: FakeOutcome,
    calls: AtomicUsize,
    last_call: Mutex<Option<(Vec<u8>, String, String)>>,
}

impl FakeTransformer {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn returning_png() -> Self {
        Self::new(FakeOutcome::Image(GeneratedImage::new(
            TINY_PNG.to_vec(),
            "image/png",
        )))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(image bytes, media type, prompt)` of the most recent call.
    pub fn last_call(&self) -> Option<(Vec<u8>, String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageTransformer for FakeTransformer {
    async fn transform(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> ProviderResult<Option<GeneratedImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() =
            Some((image.to_vec(), media_type.to_string(), prompt.to_string()));

        match &self.outcome {
            FakeOutcome::Image(image) => Ok(Some(image.clone())),
            FakeOutcome::NoImage => Ok(None),
            FakeOutcome::Error(message) => Err(ProviderError::Api {
                status: 503,
                message: message.clone(),
            }),
            FakeOutcome::Panic => panic!("fake provider exploded"),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Storage whose uploads always fail, as a full or read-only bucket would.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_new(
        &self,
        key: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(format!("bucket rejected {}", key)))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", MEDIA_BASE_URL, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Test application: server plus the fakes it was built with.
pub struct TestApp {
    pub server: TestServer,
    pub transformer: Option<Arc<FakeTransformer>>,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn provider_calls(&self) -> usize {
        self.transformer.as_ref().map(|t| t.calls()).unwrap_or(0)
    }
}

/// Default configuration with no provider credential and local storage.
pub fn create_test_config() -> Config {
    Config::from_lookup(|_| None).expect("default test config must be valid")
}

/// Live mode: requests go to the given fake provider.
pub async fn setup_test_app(transformer: FakeTransformer) -> TestApp {
    build_test_app(create_test_config(), Some(Arc::new(transformer))).await
}

/// Placeholder mode: no provider configured.
pub async fn setup_placeholder_app() -> TestApp {
    build_test_app(create_test_config(), None).await
}

pub async fn build_test_app(config: Config, transformer: Option<Arc<FakeTransformer>>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_path_buf();
    let storage = Arc::new(
        LocalStorage::new(storage_path.clone(), MEDIA_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        storage.clone() as Arc<dyn Storage>,
        transformer
            .clone()
            .map(|t| t as Arc<dyn ImageTransformer>),
    ));

    let app = routes::setup_routes(&config, state, Some(storage_path))
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        transformer,
        storage,
        _temp_dir: temp_dir,
    }
}

/// Path part of a URL handed out by the test storage, e.g. `/media/rich-image-1.png`.
pub fn media_path(image_url: &str) -> String {
    image_url
        .strip_prefix("http://localhost:4000")
        .expect("image URL must point at the test media base URL")
        .to_string()
}

/// Live mode backed by [`FailingStorage`]; no `/media` route.
pub fn setup_failing_storage_app(transformer: FakeTransformer) -> (TestServer, Arc<FakeTransformer>) {
    let config = create_test_config();
    let transformer = Arc::new(transformer);
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(FailingStorage),
        Some(transformer.clone() as Arc<dyn ImageTransformer>),
    ));

    let app = routes::setup_routes(&config, state, None).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    (server, transformer)
}
