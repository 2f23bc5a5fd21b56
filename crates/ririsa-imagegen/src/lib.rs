#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Image generation, merging, and editing over HTTP
//!
//! Handlers validate and normalize the request, [`DispatchService`] picks a
//! provider, and the provider talks to the upstream model.

mod dispatch;
mod error;
mod extract;
mod http_client;
mod protocol;
mod provider;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use ririsa_core::{ApiResult, ImagePayload};

pub use dispatch::{DispatchService, MAX_MERGE_IMAGES};
pub use error::{ImageGenError, Result};
pub use provider::{ImageGenProvider, Operation, gemini::GeminiProvider};
pub use types::{EditImageBody, GenerateImageBody, MergeImagesBody};

use extract::ExtractPayload;

/// Build the dispatch service from configuration
pub fn build_dispatch(config: &ririsa_config::Config) -> anyhow::Result<Arc<DispatchService>> {
    let service = DispatchService::from_config(&config.imagegen)
        .map_err(|e| anyhow::anyhow!("Failed to initialize image providers: {e}"))?;

    tracing::info!(
        providers = ?service.provider_names(),
        default = %service.default_provider(),
        "image providers ready"
    );

    Ok(Arc::new(service))
}

/// Routes for the three image operations, at the root and under `/api`
pub fn endpoint_router() -> Router<Arc<DispatchService>> {
    let routes = Router::new()
        .route("/generate-image", post(generate_image))
        .route("/merge-images", post(merge_images))
        .route("/edit-image", post(edit_image));

    Router::new().merge(routes.clone()).nest("/api", routes)
}

async fn generate_image(
    State(service): State<Arc<DispatchService>>,
    ExtractPayload(identity, body): ExtractPayload<GenerateImageBody>,
) -> Result<Json<ApiResult>> {
    let prompt = required_prompt(body.prompt.as_deref())?;

    tracing::debug!(client = ?identity.map(|i| i.client_id), provider = ?body.provider, "generate-image");

    let options = body.options.unwrap_or_default();

    let result = service
        .generate_image(prompt, body.provider.as_deref(), &options)
        .await?;

    Ok(Json(result))
}

async fn merge_images(
    State(service): State<Arc<DispatchService>>,
    ExtractPayload(identity, body): ExtractPayload<MergeImagesBody>,
) -> Result<Json<ApiResult>> {
    let prompt = required_prompt(body.prompt.as_deref())?;

    let images = body
        .images
        .unwrap_or_default()
        .iter()
        .take(MAX_MERGE_IMAGES)
        .map(|image| parse_image("images", image))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        client = ?identity.map(|i| i.client_id),
        images = images.len(),
        provider = ?body.provider,
        "merge-images"
    );

    let options = body.options.unwrap_or_default().with_model_override(body.model_name);

    let result = service
        .merge_images(prompt, &images, body.provider.as_deref(), &options)
        .await?;

    Ok(Json(result))
}

async fn edit_image(
    State(service): State<Arc<DispatchService>>,
    ExtractPayload(identity, body): ExtractPayload<EditImageBody>,
) -> Result<Json<ApiResult>> {
    let prompt = required_prompt(body.prompt.as_deref())?;

    let image = body
        .image
        .as_deref()
        .filter(|image| !image.is_empty())
        .ok_or_else(|| ImageGenError::missing_field("image"))?;
    let image = parse_image("image", image)?;

    let reference_image = body
        .reference_image
        .as_deref()
        .filter(|image| !image.is_empty())
        .map(|image| parse_image("reference_image", image))
        .transpose()?;

    tracing::debug!(
        client = ?identity.map(|i| i.client_id),
        has_reference = reference_image.is_some(),
        provider = ?body.provider,
        "edit-image"
    );

    let options = body.options.unwrap_or_default();

    let result = service
        .edit_image(
            prompt,
            &image,
            reference_image.as_ref(),
            body.provider.as_deref(),
            &options,
        )
        .await?;

    Ok(Json(result))
}

fn required_prompt(prompt: Option<&str>) -> Result<&str> {
    prompt
        .map(str::trim)
        .filter(|prompt| !prompt.is_empty())
        .ok_or_else(|| ImageGenError::missing_field("prompt"))
}

fn parse_image(field: &str, value: &str) -> Result<ImagePayload> {
    ImagePayload::parse(value).map_err(|e| ImageGenError::Validation(format!("{field}: {e}")))
}
