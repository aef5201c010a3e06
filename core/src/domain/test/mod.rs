use crate::domain::{
    common::{CoreError, mock::MockRepositories, services::Service},
    user::{
        entities::{InsertUserInput, NewProfile, User, UserType},
        ports::UserRepository,
    },
};

mod health {
    mod mock_test;
}
mod message {
    mod mock_test;
}
mod network {
    mod mock_test;
}
mod notification {
    mod mock_test;
}
mod post {
    mod mock_test;
}
mod user {
    mod mock_test;
}

/// A service over fresh mocks, plus a handle on the same stores for seeding and inspection.
pub(crate) fn mock_service() -> (Service<MockRepositories>, MockRepositories) {
    let repositories = MockRepositories::new();
    (Service::new(repositories.clone()), repositories)
}

/// Inserts a user straight into the repository, skipping password hashing.
pub(crate) async fn seed_user(
    repositories: &MockRepositories,
    username: &str,
    user_type: UserType,
) -> Result<User, CoreError> {
    repositories
        .users
        .insert(InsertUserInput {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            user_type,
            profile: NewProfile {
                name: username.to_string(),
                ..NewProfile::default()
            },
        })
        .await
}
