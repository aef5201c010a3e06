pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::{
    PostgresRepositories, RevConnectService, create_repositories, run_migrations,
};
pub use domain::common::services::{Repositories, Service};
pub use domain::common::{ContentLimits, CoreError, GetPaginated, TotalPaginatedElements};
pub use domain::common::mock::MockRepositories;
