use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskgen_core::export::ExportFormat;

use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/specs`: stored specs, newest first.
pub async fn list_specs(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let specs = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(serde_json::json!({
        "count": specs.len(),
        "specs": specs,
    })))
}

/// `GET /api/specs/{id}`
pub async fn get_spec(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let spec = tokio::task::spawn_blocking(move || store.get(&id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .ok_or_else(|| AppError::not_found("Spec not found"))?;

    Ok(Json(serde_json::json!({ "spec": spec })))
}

/// `DELETE /api/specs/{id}`
pub async fn delete_spec(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let deleted = tokio::task::spawn_blocking(move || store.delete(&id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    if !deleted {
        return Err(AppError::not_found("Spec not found"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(serde::Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// `GET /api/specs/{id}/export?format=markdown|text` as a downloadable document.
pub async fn export_spec(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format: ExportFormat = query.format.as_deref().unwrap_or("markdown").parse()?;

    let store = app.store.clone();
    let lookup = id.clone();
    let spec = tokio::task::spawn_blocking(move || store.get(&lookup))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .ok_or_else(|| AppError::not_found("Spec not found"))?;

    let disposition = format!("attachment; filename=\"{id}.{}\"", format.extension());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        format.render(&spec),
    )
        .into_response())
}
