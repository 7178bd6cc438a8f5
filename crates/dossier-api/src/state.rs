//! Application state shared by all handlers.
//!
//! Collaborators are created once at startup and only read afterwards.

use dossier_core::Config;
use dossier_services::ReputationService;
use dossier_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub reputation: Arc<dyn ReputationService>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        reputation: Arc<dyn ReputationService>,
    ) -> Self {
        Self {
            config,
            storage,
            reputation,
        }
    }
}
