use std::{future::IntoFuture, net::SocketAddr};

use axum::{Router, middleware::from_extractor_with_state};
use revconnect_core::{Service, create_repositories, run_migrations};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    config::Config,
    http::{
        health::routes::{health_probe_router, health_routes},
        messages::routes::message_routes,
        network::routes::network_routes,
        notifications::routes::notification_routes,
        posts::routes::post_routes,
        server::{
            ApiError, AppState,
            middleware::auth::{AuthMiddleware, entities::JwtKeys},
        },
        users::routes::{auth_routes, user_routes},
    },
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RevConnect API",
        description = "Profiles, posts, messaging, connections and notifications"
    ),
    modifiers(&SecurityAddon),
    security(("bearer_auth" = []))
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Every API route plus the Scalar UI, with auth applied to everything but
/// `/auth/*`, `/security-questions` and `/health`.
pub fn app_router(state: AppState) -> Router {
    let protected = OpenApiRouter::new()
        .merge(user_routes())
        .merge(post_routes())
        .merge(message_routes())
        .merge(network_routes())
        .merge(notification_routes())
        .layer(from_extractor_with_state::<AuthMiddleware, AppState>(
            state.clone(),
        ));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(protected)
        .merge(auth_routes())
        .merge(health_routes())
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct App {
    config: Config,
    state: AppState,
    app_router: Router,
    health_router: Router,
}

impl App {
    pub async fn new(config: Config) -> Result<Self, ApiError> {
        if config.jwt.secret_key.is_empty() {
            return Err(ApiError::StartupError {
                msg: "JWT_SECRET_KEY must not be empty".to_string(),
            });
        }

        let repositories = create_repositories(config.database.clone().into())
            .await
            .map_err(|e| ApiError::StartupError { msg: e.to_string() })?;
        run_migrations(&repositories)
            .await
            .map_err(|e| ApiError::StartupError { msg: e.to_string() })?;
        info!("database connected and migrated");

        let service = Service::with_limits(repositories, config.limits.clone().into());
        let jwt = JwtKeys::new(&config.jwt.secret_key, config.jwt.ttl_seconds);
        let state = AppState::new(service, jwt);

        let app_router = app_router(state.clone());
        let health_router = health_probe_router().with_state(state.clone());

        Ok(Self {
            config,
            state,
            app_router,
            health_router,
        })
    }

    pub async fn start(&self) -> Result<(), ApiError> {
        let api_addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.api_port));
        let health_addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.health_port));

        let api_listener = TcpListener::bind(api_addr)
            .await
            .map_err(|e| ApiError::StartupError { msg: e.to_string() })?;
        let health_listener = TcpListener::bind(health_addr)
            .await
            .map_err(|e| ApiError::StartupError { msg: e.to_string() })?;

        info!("API listening on {}", api_addr);
        info!("Health check listening on {}", health_addr);

        let api_server = axum::serve(api_listener, self.app_router.clone())
            .with_graceful_shutdown(shutdown_signal())
            .into_future();
        let health_server = axum::serve(health_listener, self.health_router.clone())
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        let served = tokio::try_join!(api_server, health_server);

        info!("shutting down, closing database pool");
        self.state.shutdown().await;

        served.map_err(|e| ApiError::StartupError { msg: e.to_string() })?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
