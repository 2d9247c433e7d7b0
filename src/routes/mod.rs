// HTTP routes

mod http;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::sampler::Sampler;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sampler: Sampler,
    pub(crate) config: AppConfig,
}

pub fn app(sampler: Sampler, config: AppConfig) -> Router {
    let state = AppState { sampler, config };
    Router::new()
        .route("/", get(|| async { "sysdash: system status dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/system-info", get(http::system_info_handler)) // GET /api/system-info
        .route("/api/status", get(http::status_handler)) // GET /api/status
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
