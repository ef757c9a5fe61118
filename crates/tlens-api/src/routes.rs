//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::analyses::{
    create_analysis, delete_analysis, get_analysis, get_chart, get_document,
};
use crate::handlers::{health, ready};
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let analysis_routes = Router::new()
        // Run the full pipeline over one upload
        .route("/analyses", post(create_analysis))
        // Result retrieval
        .route("/analyses/:analysis_id", get(get_analysis))
        .route("/analyses/:analysis_id", delete(delete_analysis))
        .route("/analyses/:analysis_id/chart", get(get_chart))
        .route("/analyses/:analysis_id/document", get(get_document));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    Router::new()
        .nest("/api", analysis_routes)
        .merge(health_routes)
        // Bounds the video upload; the default axum limit is far too
        // small for video and applies to the multipart extractor too
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
