use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::user::entities::{UserId, UserType};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct PostId(pub Uuid);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PostId {
    fn from(uuid: Uuid) -> Self {
        PostId(uuid)
    }
}

impl From<PostId> for Uuid {
    fn from(post_id: PostId) -> Self {
        post_id.0
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct CommentId(pub Uuid);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CommentId {
    fn from(uuid: Uuid) -> Self {
        CommentId(uuid)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct ShareId(pub Uuid);

impl From<Uuid> for ShareId {
    fn from(uuid: Uuid) -> Self {
        ShareId(uuid)
    }
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, Default, ToSchema,
)]
#[sqlx(type_name = "post_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Text,
    Promotional,
    Announcement,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub post_type: PostType,
    /// Lowercased, without the leading `#`
    pub hashtags: Vec<String>,
    pub is_pinned: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_at: Option<DateTime<Utc>>,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// A post without a schedule, or whose scheduled time has passed, is visible to others.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at.is_none_or(|at| at <= now)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreatePostInput {
    pub user_id: UserId,
    pub content: String,
    pub post_type: PostType,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub post_type: PostType,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CreatePostRequest {
    pub fn into_input(self, user_id: UserId) -> CreatePostInput {
        CreatePostInput {
            user_id,
            content: self.content,
            post_type: self.post_type,
            scheduled_at: self.scheduled_at,
        }
    }
}

/// What the repository persists for a new post; hashtags are already extracted.
#[derive(Debug, Clone)]
pub struct InsertPostInput {
    pub user_id: UserId,
    pub content: String,
    pub post_type: PostType,
    pub hashtags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdatePostInput {
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub post_type: Option<PostType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdatePostRequest {
    pub content: String,
    pub post_type: Option<PostType>,
}

impl UpdatePostRequest {
    pub fn into_input(self, post_id: PostId, user_id: UserId) -> UpdatePostInput {
        UpdatePostInput {
            post_id,
            user_id,
            content: self.content,
            post_type: self.post_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePostRecord {
    pub content: String,
    pub hashtags: Vec<String>,
    pub post_type: Option<PostType>,
}

#[derive(Debug, Deserialize, Clone, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedFilter {
    pub post_type: Option<PostType>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub text: String,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Share {
    pub id: ShareId,
    pub post_id: PostId,
    pub user_id: UserId,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct PostAnalytics {
    pub post_id: PostId,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

impl PostAnalytics {
    pub fn engagement(&self) -> u64 {
        self.likes + self.comments + self.shares
    }
}
