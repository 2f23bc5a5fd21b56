#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Mode presets: named prompt templates shared by every client

mod error;
mod store;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};

pub use error::{ModesError, Result};
pub use store::ModeStore;
pub use types::{DEFAULT_MODE_IDS, ModePreset, ModesDatabase, default_presets};

/// Mode routes, at the root and under `/api`
pub fn router() -> Router<Arc<ModeStore>> {
    let routes = Router::new()
        .route("/modes", get(list_modes))
        .route("/modes/{id}", axum::routing::post(add_mode).put(update_mode).delete(delete_mode));

    Router::new().merge(routes.clone()).nest("/api", routes)
}

async fn list_modes(State(store): State<Arc<ModeStore>>) -> Json<ModesDatabase> {
    Json(store.snapshot().await)
}

async fn add_mode(
    State(store): State<Arc<ModeStore>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<ModePreset>, JsonRejection>,
) -> Result<Json<ModesDatabase>> {
    let Json(preset) = body.map_err(invalid_body)?;
    Ok(Json(store.add(&id, preset).await?))
}

async fn update_mode(
    State(store): State<Arc<ModeStore>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<ModePreset>, JsonRejection>,
) -> Result<Json<ModesDatabase>> {
    let Json(preset) = body.map_err(invalid_body)?;
    Ok(Json(store.update(&id, preset).await?))
}

async fn delete_mode(State(store): State<Arc<ModeStore>>, Path(id): Path<String>) -> Result<Json<ModesDatabase>> {
    Ok(Json(store.delete(&id).await?))
}

fn invalid_body(rejection: JsonRejection) -> ModesError {
    let status = if rejection.status().is_client_error() {
        rejection.status()
    } else {
        axum::http::StatusCode::BAD_REQUEST
    };

    ModesError::InvalidBody {
        status,
        message: rejection.body_text(),
    }
}
