use crate::domain::{
    common::{CoreError, mock::MockRepositories, services::Service},
    health::port::{HealthService, MockHealthRepository},
};

#[tokio::test]
async fn test_check_health_success() -> Result<(), Box<dyn std::error::Error>> {
    let service = Service::new(MockRepositories::new());

    let healthy = service.check_health().await?;
    assert!(healthy.value());

    Ok(())
}

#[tokio::test]
async fn test_check_health_unhealthy() {
    let repositories = MockRepositories::new().with_health(MockHealthRepository::unhealthy());
    let service = Service::new(repositories);

    let result = service.check_health().await;
    assert_eq!(result.unwrap_err(), CoreError::Unhealthy);
}
