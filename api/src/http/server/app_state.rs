use revconnect_core::{PostgresRepositories, RevConnectService};

use crate::http::server::middleware::auth::entities::JwtKeys;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: RevConnectService,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(service: RevConnectService, jwt: JwtKeys) -> Self {
        Self { service, jwt }
    }

    pub fn from_repositories(repositories: PostgresRepositories, jwt: JwtKeys) -> Self {
        Self::new(repositories.into(), jwt)
    }

    /// Shutdown the underlying database pool
    pub async fn shutdown(&self) {
        self.service.shutdown_pool().await
    }
}
