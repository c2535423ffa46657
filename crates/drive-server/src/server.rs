use std::sync::Arc;

use tokio::net::TcpListener;

use drive_sdk::CatalogService;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Drive HTTP server.
pub struct DriveServer {
    config: ServerConfig,
    state: AppState,
}

impl DriveServer {
    pub fn new(config: ServerConfig, service: Arc<CatalogService>) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            bucket = %self.state.service.blobs().bucket(),
            "drive server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
