use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use taskgen_core::TaskgenError;
use taskgen_llm::GenerateError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 404 Not Found errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 404 through
/// the `anyhow::Error` chain without touching the `TaskgenError` enum.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(TaskgenError::Validation(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        if let Some(GenerateError::RateLimited {
            message,
            retry_after_secs,
        }) = self.0.downcast_ref::<GenerateError>()
        {
            let body = serde_json::json!({
                "error": message,
                "retryAfter": retry_after_secs,
            });
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                axum::Json(body),
            )
                .into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<TaskgenError>() {
            match e {
                TaskgenError::Validation(_) | TaskgenError::InvalidExportFormat(_) => {
                    StatusCode::BAD_REQUEST
                }
                TaskgenError::SpecNotFound(_) => StatusCode::NOT_FOUND,
                TaskgenError::Storage(_)
                | TaskgenError::Io(_)
                | TaskgenError::Yaml(_)
                | TaskgenError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(e) = self.0.downcast_ref::<GenerateError>() {
            match e {
                GenerateError::Validation(_) => StatusCode::BAD_REQUEST,
                GenerateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                GenerateError::Provider(_) | GenerateError::Extraction(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgen_core::ExtractionError;
    use taskgen_llm::GeminiError;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError(TaskgenError::Validation("Users are required".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generate_validation_maps_to_400() {
        let err = AppError(GenerateError::Validation("Goal too short".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_export_format_maps_to_400() {
        let err = AppError(TaskgenError::InvalidExportFormat("pdf".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn spec_not_found_maps_to_404() {
        let err = AppError(TaskgenError::SpecNotFound("spec_1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_constructor_maps_to_404() {
        let err = AppError::not_found("Spec not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rate_limited_maps_to_429_with_retry_after() {
        let err = AppError(
            GenerateError::RateLimited {
                message: "quota".into(),
                retry_after_secs: 60,
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn extraction_maps_to_500() {
        let err = AppError(GenerateError::Extraction(ExtractionError::NoJson).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_maps_to_500() {
        let err = AppError(GenerateError::Provider(GeminiError::MissingApiKey).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_maps_to_500() {
        let err = AppError(TaskgenError::Storage("disk full".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_is_json() {
        let err = AppError::bad_request("Goal must be at least 10 characters");
        let response = err.into_response();
        let ct = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(ct.contains("application/json"));
    }
}
