use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{post::entities::PostId, user::entities::UserId};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct NotificationId(pub Uuid);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NotificationId {
    fn from(uuid: Uuid) -> Self {
        NotificationId(uuid)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ConnectionRequest,
    ConnectionAccepted,
    NewFollower,
    Like,
    Comment,
    Share,
    NewPost,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    pub kind: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub related_user_id: Option<UserId>,
    pub related_post_id: Option<PostId>,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationType,
    pub message: String,
    pub related_user_id: Option<UserId>,
    pub related_post_id: Option<PostId>,
}

impl NewNotification {
    /// A notification about something `actor` did, optionally on one of the recipient's posts.
    pub fn from_actor(
        recipient: UserId,
        kind: NotificationType,
        actor: UserId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: recipient,
            kind,
            message: message.into(),
            related_user_id: Some(actor),
            related_post_id: None,
        }
    }

    pub fn on_post(mut self, post_id: PostId) -> Self {
        self.related_post_id = Some(post_id);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema, sqlx::FromRow)]
pub struct NotificationPreference {
    pub user_id: UserId,
    pub connection_requests: bool,
    pub new_followers: bool,
    pub likes: bool,
    pub comments: bool,
    pub shares: bool,
    pub new_posts: bool,
}

impl NotificationPreference {
    /// What a user gets before they ever touch their settings: everything on.
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            connection_requests: true,
            new_followers: true,
            likes: true,
            comments: true,
            shares: true,
            new_posts: true,
        }
    }

    pub fn allows(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::ConnectionRequest => self.connection_requests,
            NotificationType::NewFollower => self.new_followers,
            NotificationType::Like => self.likes,
            NotificationType::Comment => self.comments,
            NotificationType::Share => self.shares,
            NotificationType::NewPost => self.new_posts,
            NotificationType::ConnectionAccepted => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub connection_requests: bool,
    pub new_followers: bool,
    pub likes: bool,
    pub comments: bool,
    pub shares: bool,
    pub new_posts: bool,
}

impl UpdatePreferencesRequest {
    pub fn into_preference(self, user_id: UserId) -> NotificationPreference {
        NotificationPreference {
            user_id,
            connection_requests: self.connection_requests,
            new_followers: self.new_followers,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            new_posts: self.new_posts,
        }
    }
}
