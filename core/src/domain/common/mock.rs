use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    common::{CoreError, services::Repositories},
    health::port::MockHealthRepository,
    message::ports::{MockBlockedUserRepository, MockMessageRepository},
    network::ports::{MockConnectionRepository, MockFollowRepository},
    notification::ports::MockNotificationRepository,
    post::ports::{
        MockCommentRepository, MockLikeRepository, MockPostRepository, MockShareRepository,
    },
    user::ports::{MockSecurityQuestionRepository, MockUserRepository},
};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CoreError> {
    mutex.lock().map_err(|_| CoreError::DatabaseError {
        msg: "mock store lock poisoned".to_string(),
    })
}

/// In-memory implementation of every port. Clones share the same underlying stores.
#[derive(Clone)]
pub struct MockRepositories {
    pub users: MockUserRepository,
    pub security_questions: MockSecurityQuestionRepository,
    pub posts: MockPostRepository,
    pub comments: MockCommentRepository,
    pub likes: MockLikeRepository,
    pub shares: MockShareRepository,
    pub messages: MockMessageRepository,
    pub blocked_users: MockBlockedUserRepository,
    pub connections: MockConnectionRepository,
    pub follows: MockFollowRepository,
    pub notifications: MockNotificationRepository,
    pub health: MockHealthRepository,
}

impl Default for MockRepositories {
    fn default() -> Self {
        let comments = MockCommentRepository::new();
        let likes = MockLikeRepository::new();
        let shares = MockShareRepository::new();

        Self {
            users: MockUserRepository::default(),
            security_questions: MockSecurityQuestionRepository::default(),
            posts: MockPostRepository::with_engagement(
                comments.clone(),
                likes.clone(),
                shares.clone(),
            ),
            comments,
            likes,
            shares,
            messages: MockMessageRepository::default(),
            blocked_users: MockBlockedUserRepository::default(),
            connections: MockConnectionRepository::default(),
            follows: MockFollowRepository::default(),
            notifications: MockNotificationRepository::default(),
            health: MockHealthRepository::default(),
        }
    }
}

impl MockRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_health(mut self, health: MockHealthRepository) -> Self {
        self.health = health;
        self
    }
}

impl Repositories for MockRepositories {
    type Users = MockUserRepository;
    type SecurityQuestions = MockSecurityQuestionRepository;
    type Posts = MockPostRepository;
    type Comments = MockCommentRepository;
    type Likes = MockLikeRepository;
    type Shares = MockShareRepository;
    type Messages = MockMessageRepository;
    type BlockedUsers = MockBlockedUserRepository;
    type Connections = MockConnectionRepository;
    type Follows = MockFollowRepository;
    type Notifications = MockNotificationRepository;
    type Health = MockHealthRepository;

    fn users(&self) -> &Self::Users {
        &self.users
    }

    fn security_questions(&self) -> &Self::SecurityQuestions {
        &self.security_questions
    }

    fn posts(&self) -> &Self::Posts {
        &self.posts
    }

    fn comments(&self) -> &Self::Comments {
        &self.comments
    }

    fn likes(&self) -> &Self::Likes {
        &self.likes
    }

    fn shares(&self) -> &Self::Shares {
        &self.shares
    }

    fn messages(&self) -> &Self::Messages {
        &self.messages
    }

    fn blocked_users(&self) -> &Self::BlockedUsers {
        &self.blocked_users
    }

    fn connections(&self) -> &Self::Connections {
        &self.connections
    }

    fn follows(&self) -> &Self::Follows {
        &self.follows
    }

    fn notifications(&self) -> &Self::Notifications {
        &self.notifications
    }

    fn health(&self) -> &Self::Health {
        &self.health
    }
}
