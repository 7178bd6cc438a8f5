//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let body_limit = state.config.max_request_body_bytes();
    tracing::debug!(body_limit_bytes = body_limit, "Request body limit configured");

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/register/{contact_id}/upload",
            post(handlers::register_upload::upload_registration_documents),
        )
        .with_state(state)
        // The tower layer replaces axum's default 2 MB extractor limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "alive" })
}
