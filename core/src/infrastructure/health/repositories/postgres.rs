use sqlx::PgPool;
use tracing::error;

use crate::domain::health::{entities::IsHealthy, port::HealthRepository};

#[derive(Clone)]
pub struct PostgresHealthRepository {
    pool: PgPool,
}

impl PostgresHealthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HealthRepository for PostgresHealthRepository {
    async fn ping(&self) -> IsHealthy {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => IsHealthy::new(true),
            Err(e) => {
                error!(error = %e, "database health check failed");
                IsHealthy::new(false)
            }
        }
    }
}
