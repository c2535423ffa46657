use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router with all drive endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/v1/files",
            get(handler::list_handler).post(handler::upload_handler),
        )
        .route(
            "/v1/files/:id",
            get(handler::get_file_handler).delete(handler::delete_handler),
        )
        .route("/v1/stats", get(handler::stats_handler))
        .route("/v1/blobs/:bucket/*key", get(handler::blob_handler))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
