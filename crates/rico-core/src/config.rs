//! Configuration module
//!
//! Startup configuration for the generation endpoint: server, provider credentials,
//! degraded-mode policy, storage backend and CORS settings.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const GEMINI_MODEL: &str = "gemini-2.5-flash-image";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_TIMEOUT_SECS: u64 = 120;
const PLACEHOLDER_BASE_URL: &str = "https://picsum.photos";
const OBJECT_PREFIX: &str = "rich-image";
const MAX_REQUEST_BODY_MB: usize = 15;
const LOCAL_STORAGE_PATH: &str = "./data/media";
const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// How generation requests are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Requests are forwarded to the image provider.
    Live,
    /// No provider credential: requests get a deterministic placeholder URL.
    Placeholder,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Live => "live",
            GenerationMode::Placeholder => "placeholder",
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Image provider
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
    // Degraded mode
    pub placeholder_fallback: bool,
    pub placeholder_base_url: String,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: Option<String>,
    pub object_prefix: String,
    // HTTP
    pub max_request_body_bytes: usize,
    pub cors_allow_headers: Vec<String>,
}

impl Config {
    /// Load `.env` (if present) and read configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::Local,
        };

        let max_request_body_mb = var("MAX_REQUEST_BODY_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_REQUEST_BODY_MB);

        let cors_allow_headers = var("CORS_ALLOW_HEADERS")
            .unwrap_or_else(|| CORS_ALLOW_HEADERS.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port,
            environment,
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| GEMINI_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            gemini_timeout_secs: var("GEMINI_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(GEMINI_TIMEOUT_SECS),
            placeholder_fallback: var("PLACEHOLDER_FALLBACK")
                .map(|s| s.trim().to_lowercase())
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            placeholder_base_url: var("PLACEHOLDER_BASE_URL")
                .unwrap_or_else(|| PLACEHOLDER_BASE_URL.to_string()),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            object_prefix: var("OBJECT_PREFIX").unwrap_or_else(|| OBJECT_PREFIX.to_string()),
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
            cors_allow_headers,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Generation mode derived from the provider credential and the fallback flag.
    pub fn generation_mode(&self) -> GenerationMode {
        if self.gemini_api_key.is_some() {
            GenerationMode::Live
        } else {
            GenerationMode::Placeholder
        }
    }

    /// Region used by the S3 backend: `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    /// Public base URL of the local backend. Defaults to this server's `/media` route.
    pub fn local_storage_base_url(&self) -> String {
        self.local_storage_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/media", self.server_port))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.gemini_api_key.is_none() && !self.placeholder_fallback {
            return Err(anyhow::anyhow!(
                "GEMINI_API_KEY must be set when PLACEHOLDER_FALLBACK is disabled"
            ));
        }

        if self.gemini_timeout_secs == 0 {
            return Err(anyhow::anyhow!("GEMINI_TIMEOUT_SECS cannot be 0"));
        }

        if self.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_BODY_MB cannot be 0"));
        }

        if self.object_prefix.contains('/') || self.object_prefix.contains("..") {
            return Err(anyhow::anyhow!(
                "OBJECT_PREFIX must be a plain name without path separators"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {}
        }

        Ok(())
    }
}
