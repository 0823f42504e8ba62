/// Shared application state
use crate::config::ServerConfig;
use crate::services::AudioGateway;
use mezgebe_core::CatalogProvider;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub gateway: Arc<AudioGateway>,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    pub fn new(
        config: Arc<ServerConfig>,
        gateway: Arc<AudioGateway>,
        catalog: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            config,
            gateway,
            catalog,
        }
    }
}
