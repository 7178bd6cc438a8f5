//! Collaborator initialization and application state setup

use crate::state::AppState;
use anyhow::{Context, Result};
use dossier_core::Config;
use dossier_services::VirusTotalService;
use dossier_storage::create_storage;
use std::sync::Arc;

/// Create the storage backend and reputation client, returning the application state
pub async fn initialize_services(config: Config) -> Result<Arc<AppState>> {
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage backend initialized");

    let reputation = VirusTotalService::new(
        config.virustotal_base_url.clone(),
        config.virustotal_api_key.clone(),
        config.reputation_timeout_secs,
        config.reputation_fail_closed,
    )?;
    tracing::info!(
        base_url = %config.virustotal_base_url,
        timeout_secs = config.reputation_timeout_secs,
        fail_closed = config.reputation_fail_closed,
        "Reputation service initialized"
    );

    Ok(Arc::new(AppState::new(
        config,
        storage,
        Arc::new(reputation),
    )))
}
