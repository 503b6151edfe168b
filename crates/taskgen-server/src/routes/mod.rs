pub mod generate;
pub mod specs;
pub mod status;

use axum::http::{StatusCode, Uri};
use axum::Json;

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not Found",
            "message": format!("Route {} not found", uri.path()),
        })),
    )
}
