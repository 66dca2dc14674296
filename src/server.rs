//! HTTP application assembly: API routes, static files and middleware.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::app_state::AppState;
use crate::config::BoardConfig;

/// Builds the full application router.
///
/// Mounts the REST API, `GET /uploads/{filename}` from the upload
/// directory and `GET /` from the configured HTML shell. Request bodies
/// above `max_content_length` are rejected with 413 before reaching a
/// handler.
pub fn build_app(state: AppState, config: &BoardConfig) -> Router {
    let uploads = ServeDir::new(state.board.uploads().dir());

    let router = Router::new()
        .merge(api::build_router())
        .nest_service("/uploads", uploads)
        .route_service("/", ServeFile::new(&config.index_html));

    // The UI reads the document already served by `/api-docs/openapi.json`.
    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json")),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(config.max_content_length))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(config.max_content_length)),
        )
        .with_state(state)
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
