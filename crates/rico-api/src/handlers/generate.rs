//! Rich-image generation handler.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use base64::Engine;
use chrono::Utc;
use rico_core::{AppError, GenerateRequest, GenerateResponse, Scenario};
use rico_storage::{extension_for_content_type, generate_object_name};
use std::sync::Arc;

/// Media type declared to the provider for the uploaded photo.
const INPUT_MEDIA_TYPE: &str = "image/jpeg";

#[tracing::instrument(
    skip(state, payload),
    fields(scenario = tracing::field::Empty, operation = "generate_rich_image")
)]
pub async fn generate_rich_image(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, HttpAppError> {
    let image = payload
        .image
        .as_deref()
        .map(str::trim)
        .filter(|image| !image.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing image data".to_string()))?;

    let scenario = match payload.scenario.as_deref() {
        None => return Err(AppError::InvalidInput("Missing scenario".to_string()).into()),
        Some(key) => key
            .parse::<Scenario>()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?,
    };
    tracing::Span::current().record("scenario", scenario.key());

    let image_bytes = base64::engine::general_purpose::STANDARD
        .decode(image)
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 image data: {}", e)))?;

    let Some(transformer) = state.transformer.as_ref() else {
        let url = placeholder_url(&state.config.placeholder_base_url, scenario);
        tracing::debug!(url = %url, "Serving placeholder image");
        return Ok(Json(GenerateResponse::placeholder(url)));
    };

    let generated = transformer
        .transform(&image_bytes, INPUT_MEDIA_TYPE, &scenario.prompt())
        .await?
        .ok_or(AppError::GenerationFailed)?;

    let key = generate_object_name(
        &state.config.object_prefix,
        extension_for_content_type(&generated.mime_type),
        Utc::now(),
    );

    let image_url = state
        .storage
        .upload_new(&key, &generated.mime_type, generated.data)
        .await?;

    tracing::info!(
        key = %key,
        provider = transformer.name(),
        "Rich image generated and stored"
    );

    Ok(Json(GenerateResponse::success(image_url)))
}

/// Deterministic stand-in image for a scenario.
fn placeholder_url(base_url: &str, scenario: Scenario) -> String {
    format!(
        "{}/seed/{}/800/600",
        base_url.trim_end_matches('/'),
        scenario.key()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_url_is_stable_per_scenario() {
        assert_eq!(
            placeholder_url("https://picsum.photos/", Scenario::UrbanCeo),
            "https://picsum.photos/seed/urban-ceo/800/600"
        );
        assert_ne!(
            placeholder_url("https://picsum.photos", Scenario::SilentElite),
            placeholder_url("https://picsum.photos", Scenario::InternationalFreedom)
        );
    }
}
