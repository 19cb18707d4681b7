//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod provider;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use rico_core::{Config, StorageBackend};
use std::path::PathBuf;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first so validation warnings are visible
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;
    let transformer = provider::setup_provider(&config)?;

    let media_dir = match config.storage_backend {
        StorageBackend::Local => Some(PathBuf::from(&config.local_storage_path)),
        StorageBackend::S3 => None,
    };

    let state = Arc::new(AppState::new(config.clone(), storage, transformer));

    let router = routes::setup_routes(&config, state.clone(), media_dir)?;

    Ok((state, router))
}
