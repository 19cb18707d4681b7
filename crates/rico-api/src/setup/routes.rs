//! Route configuration and setup

use crate::error::handle_panic;
use crate::handlers;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{any, get},
    Router,
};
use rico_core::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// `media_dir` is the local storage directory, served under `/media` when set.
pub fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
    media_dir: Option<PathBuf>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let allow_headers = HeaderValue::from_str(&config.cors_allow_headers.join(", "))
        .context("CORS_ALLOW_HEADERS contains invalid characters")?;

    let mut router = Router::new()
        .route("/", any(handlers::generate::generate_rich_image))
        .route(
            "/generate-rich-image",
            any(handlers::generate::generate_rich_image),
        )
        .route("/health", get(handlers::health::health_check))
        .with_state(state);

    if let Some(dir) = media_dir {
        tracing::info!(path = %dir.display(), "Serving local media under /media");
        router = router.nest_service("/media", ServeDir::new(dir));
    }

    // CorsLayer answers every OPTIONS request itself; the outer header layer puts the
    // allowed headers on non-preflight responses too.
    let app = router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            allow_headers,
        ));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let headers = config
        .cors_allow_headers
        .iter()
        .map(|h| HeaderName::from_bytes(h.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
        .context("CORS_ALLOW_HEADERS contains an invalid header name")?;

    Ok(CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers))
}
