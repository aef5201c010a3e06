use api::app::App;
use api::http::server::ApiError;

use api::config::Config;
use clap::Parser;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Used when RUST_LOG is unset. Request spans come from `tower_http::trace`.
const DEFAULT_LOG_FILTER: &str = "info,api=info,revconnect_core=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // e.g. RUST_LOG=revconnect_core::domain::notification=debug to see suppressed notifications
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env file, reading configuration from the environment only"),
    }

    let config = Config::parse();
    info!(
        environment = ?config.environment,
        api_port = config.server.api_port,
        health_port = config.server.health_port,
        "starting RevConnect API"
    );

    let app = App::new(config).await?;
    app.start().await
}
