use crate::domain::{
    common::ContentLimits,
    health::port::HealthRepository,
    message::ports::{BlockedUserRepository, MessageRepository},
    network::ports::{ConnectionRepository, FollowRepository},
    notification::ports::NotificationRepository,
    post::ports::{CommentRepository, LikeRepository, PostRepository, ShareRepository},
    user::ports::{SecurityQuestionRepository, UserRepository},
};

/// The full set of data-access ports a [`Service`] needs.
///
/// Each entity keeps its own repository trait; this bundle only ties one concrete
/// implementation of every port together so that the service carries a single type
/// parameter instead of a dozen.
pub trait Repositories: Send + Sync {
    type Users: UserRepository;
    type SecurityQuestions: SecurityQuestionRepository;
    type Posts: PostRepository;
    type Comments: CommentRepository;
    type Likes: LikeRepository;
    type Shares: ShareRepository;
    type Messages: MessageRepository;
    type BlockedUsers: BlockedUserRepository;
    type Connections: ConnectionRepository;
    type Follows: FollowRepository;
    type Notifications: NotificationRepository;
    type Health: HealthRepository;

    fn users(&self) -> &Self::Users;
    fn security_questions(&self) -> &Self::SecurityQuestions;
    fn posts(&self) -> &Self::Posts;
    fn comments(&self) -> &Self::Comments;
    fn likes(&self) -> &Self::Likes;
    fn shares(&self) -> &Self::Shares;
    fn messages(&self) -> &Self::Messages;
    fn blocked_users(&self) -> &Self::BlockedUsers;
    fn connections(&self) -> &Self::Connections;
    fn follows(&self) -> &Self::Follows;
    fn notifications(&self) -> &Self::Notifications;
    fn health(&self) -> &Self::Health;
}

#[derive(Clone)]
pub struct Service<R>
where
    R: Repositories,
{
    pub(crate) repositories: R,
    pub(crate) limits: ContentLimits,
}

impl<R> Service<R>
where
    R: Repositories,
{
    pub fn new(repositories: R) -> Self {
        Self::with_limits(repositories, ContentLimits::default())
    }

    pub fn with_limits(repositories: R, limits: ContentLimits) -> Self {
        Self {
            repositories,
            limits,
        }
    }

    pub fn repositories(&self) -> &R {
        &self.repositories
    }

    pub fn limits(&self) -> &ContentLimits {
        &self.limits
    }
}
