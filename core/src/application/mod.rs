use sqlx::{
    PgPool,
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{
    domain::common::{CoreError, services::{Repositories, Service}},
    infrastructure::{
        health::repositories::postgres::PostgresHealthRepository,
        message::repositories::postgres::{
            PostgresBlockedUserRepository, PostgresMessageRepository,
        },
        network::repositories::postgres::{PostgresConnectionRepository, PostgresFollowRepository},
        notification::repositories::postgres::PostgresNotificationRepository,
        post::repositories::postgres::{
            PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
            PostgresShareRepository,
        },
        user::repositories::postgres::{
            PostgresSecurityQuestionRepository, PostgresUserRepository,
        },
    },
};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Concrete service type backed by PostgreSQL repositories
pub type RevConnectService = Service<PostgresRepositories>;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: PgPool,
    pub user_repository: PostgresUserRepository,
    pub security_question_repository: PostgresSecurityQuestionRepository,
    pub post_repository: PostgresPostRepository,
    pub comment_repository: PostgresCommentRepository,
    pub like_repository: PostgresLikeRepository,
    pub share_repository: PostgresShareRepository,
    pub message_repository: PostgresMessageRepository,
    pub blocked_user_repository: PostgresBlockedUserRepository,
    pub connection_repository: PostgresConnectionRepository,
    pub follow_repository: PostgresFollowRepository,
    pub notification_repository: PostgresNotificationRepository,
    pub health_repository: PostgresHealthRepository,
}

impl PostgresRepositories {
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            user_repository: PostgresUserRepository::new(pool.clone()),
            security_question_repository: PostgresSecurityQuestionRepository::new(pool.clone()),
            post_repository: PostgresPostRepository::new(pool.clone()),
            comment_repository: PostgresCommentRepository::new(pool.clone()),
            like_repository: PostgresLikeRepository::new(pool.clone()),
            share_repository: PostgresShareRepository::new(pool.clone()),
            message_repository: PostgresMessageRepository::new(pool.clone()),
            blocked_user_repository: PostgresBlockedUserRepository::new(pool.clone()),
            connection_repository: PostgresConnectionRepository::new(pool.clone()),
            follow_repository: PostgresFollowRepository::new(pool.clone()),
            notification_repository: PostgresNotificationRepository::new(pool.clone()),
            health_repository: PostgresHealthRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn shutdown_pool(&self) {
        self.pool.close().await;
    }
}

pub async fn create_repositories(
    pg_connection_options: PgConnectOptions,
) -> Result<PostgresRepositories, CoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(pg_connection_options)
        .await
        .map_err(|e| CoreError::ServiceUnavailable(e.to_string()))?;

    Ok(PostgresRepositories::from_pool(pool))
}

pub async fn run_migrations(repositories: &PostgresRepositories) -> Result<(), CoreError> {
    MIGRATOR
        .run(&repositories.pool)
        .await
        .map_err(|e| CoreError::DatabaseError { msg: e.to_string() })
}

impl From<PostgresRepositories> for RevConnectService {
    fn from(repositories: PostgresRepositories) -> Self {
        Service::new(repositories)
    }
}

impl RevConnectService {
    pub async fn shutdown_pool(&self) {
        self.repositories.shutdown_pool().await;
    }
}

impl Repositories for PostgresRepositories {
    type Users = PostgresUserRepository;
    type SecurityQuestions = PostgresSecurityQuestionRepository;
    type Posts = PostgresPostRepository;
    type Comments = PostgresCommentRepository;
    type Likes = PostgresLikeRepository;
    type Shares = PostgresShareRepository;
    type Messages = PostgresMessageRepository;
    type BlockedUsers = PostgresBlockedUserRepository;
    type Connections = PostgresConnectionRepository;
    type Follows = PostgresFollowRepository;
    type Notifications = PostgresNotificationRepository;
    type Health = PostgresHealthRepository;

    fn users(&self) -> &Self::Users {
        &self.user_repository
    }

    fn security_questions(&self) -> &Self::SecurityQuestions {
        &self.security_question_repository
    }

    fn posts(&self) -> &Self::Posts {
        &self.post_repository
    }

    fn comments(&self) -> &Self::Comments {
        &self.comment_repository
    }

    fn likes(&self) -> &Self::Likes {
        &self.like_repository
    }

    fn shares(&self) -> &Self::Shares {
        &self.share_repository
    }

    fn messages(&self) -> &Self::Messages {
        &self.message_repository
    }

    fn blocked_users(&self) -> &Self::BlockedUsers {
        &self.blocked_user_repository
    }

    fn connections(&self) -> &Self::Connections {
        &self.connection_repository
    }

    fn follows(&self) -> &Self::Follows {
        &self.follow_repository
    }

    fn notifications(&self) -> &Self::Notifications {
        &self.notification_repository
    }

    fn health(&self) -> &Self::Health {
        &self.health_repository
    }
}
