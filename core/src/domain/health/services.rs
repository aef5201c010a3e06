use crate::domain::{
    common::{
        CoreError,
        services::{Repositories, Service},
    },
    health::{
        entities::IsHealthy,
        port::{HealthRepository, HealthService},
    },
};

impl<R> HealthService for Service<R>
where
    R: Repositories,
{
    async fn check_health(&self) -> Result<IsHealthy, CoreError> {
        self.repositories.health().ping().await.to_result()
    }
}
