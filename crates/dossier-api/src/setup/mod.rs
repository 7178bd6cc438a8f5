//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::Result;
use dossier_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing(&config.log_format)?;

    tracing::info!(
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let state = services::initialize_services(config).await?;

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
