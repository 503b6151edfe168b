pub mod error;
pub mod routes;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
///
/// With `frontend_url` set, CORS is restricted to that origin (credentials
/// allowed); otherwise any origin may call the API.
pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Router {
    let cors = cors_layer(frontend_url);

    Router::new()
        // Generation
        .route("/api/generate", post(routes::generate::generate))
        // Stored specs
        .route("/api/specs", get(routes::specs::list_specs))
        .route(
            "/api/specs/{id}",
            get(routes::specs::get_spec).delete(routes::specs::delete_spec),
        )
        .route("/api/specs/{id}/export", get(routes::specs::export_spec))
        // Health
        .route("/api/status", get(routes::status::get_status))
        .route("/api/health", get(routes::status::liveness))
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.and_then(|url| match HeaderValue::from_str(url) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("ignoring invalid frontend origin '{url}'; allowing any origin");
            None
        }
    });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Start the taskgen API server on `port`.
pub async fn serve(app_state: AppState, port: u16, frontend_url: Option<&str>) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, frontend_url).await
}

/// Start the taskgen API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    frontend_url: Option<&str>,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state, frontend_url);

    tracing::info!("taskgen server listening on http://localhost:{actual_port}");
    tracing::info!("health check: http://localhost:{actual_port}/api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
