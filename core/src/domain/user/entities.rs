use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct UserId(pub Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        UserId(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(user_id: UserId) -> Self {
        user_id.0
    }
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, Default, ToSchema,
)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Personal,
    Creator,
    Business,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password_hash: String,
    pub user_type: UserType,
    pub is_private: bool,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            user_type: self.user_type,
            is_private: self.is_private,
        }
    }
}

/// The public face of a user, used wherever other people's accounts are listed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema, sqlx::FromRow)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub user_type: UserType,
    pub is_private: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_picture_url: Option<String>,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, ToSchema)]
pub struct NewProfile {
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub user_type: UserType,
    pub profile: NewProfile,
}

/// What the repository persists on registration: the password is already hashed.
#[derive(Debug, Clone)]
pub struct InsertUserInput {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub profile: NewProfile,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct LoginInput {
    /// Email address or username
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ResetPasswordInput {
    pub email: String,
    pub question_id: QuestionId,
    pub answer: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdatePrivacyRequest {
    pub is_private: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdateProfileInput {
    pub user_id: UserId,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_input(self, user_id: UserId) -> UpdateProfileInput {
        UpdateProfileInput {
            user_id,
            name: self.name,
            bio: self.bio,
            location: self.location,
            website: self.website,
            profile_picture_url: self.profile_picture_url,
        }
    }
}

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = i32)]
pub struct QuestionId(pub i32);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema, sqlx::FromRow)]
pub struct SecurityQuestion {
    pub id: QuestionId,
    pub question: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SecurityAnswer {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub answer_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SetSecurityAnswerRequest {
    pub question_id: QuestionId,
    pub answer: String,
}
