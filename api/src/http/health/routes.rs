use axum::{Router, routing::get};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    health::handlers::{__path_health_check, health_check},
    server::AppState,
};

/// Documented health route, served on the API port.
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// Bare health router for the dedicated health port.
pub fn health_probe_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
