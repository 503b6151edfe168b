use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskgen_core::health;

use crate::state::AppState;

/// `GET /api/status`: backend, storage and provider checks rolled into one.
pub async fn get_status(State(app): State<AppState>) -> Response {
    let backend = health::backend_check(app.started_at.elapsed());

    let store = app.store.clone();
    let storage = match tokio::task::spawn_blocking(move || store.health_check()).await {
        Ok(check) => check,
        Err(e) => {
            tracing::error!("storage health check did not complete: {e}");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "overall": health::HealthStatus::Unhealthy,
                    "error": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    let llm = app.generator.check_health().await;
    let report = health::aggregate(backend, storage, llm);
    if report.overall == health::HealthStatus::Unhealthy {
        tracing::warn!(
            storage = %report.checks.storage.status,
            llm = %report.checks.llm.status,
            "status check unhealthy"
        );
    }
    Json(report).into_response()
}

/// `GET /api/health`: liveness only.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Server is running",
        "timestamp": chrono::Utc::now(),
    }))
}
