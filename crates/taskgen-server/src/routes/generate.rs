use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use taskgen_core::FeatureRequest;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub users: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

/// `POST /api/generate`: generate a breakdown and store it.
pub async fn generate(
    State(app): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let feature = FeatureRequest::new(
        body.goal.as_deref().unwrap_or_default(),
        body.users.as_deref().unwrap_or_default(),
        body.constraints.as_deref(),
        body.template.as_deref(),
    )?;

    tracing::info!(template = %feature.template, "generating breakdown");
    let generated = app.generator.generate(&feature).await?;

    let store = app.store.clone();
    let spec = tokio::task::spawn_blocking(move || store.save(feature, generated))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "spec": spec,
    })))
}
