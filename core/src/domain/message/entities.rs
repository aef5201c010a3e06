use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::entities::UserId;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct MessageId(pub Uuid);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(uuid: Uuid) -> Self {
        MessageId(uuid)
    }
}

impl From<MessageId> for Uuid {
    fn from(message_id: MessageId) -> Self {
        message_id.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub is_read: bool,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SendMessageInput {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: UserId,
    pub text: String,
}

impl SendMessageRequest {
    pub fn into_input(self, sender_id: UserId) -> SendMessageInput {
        SendMessageInput {
            sender_id,
            receiver_id: self.receiver_id,
            text: self.text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct Block {
    pub blocker_id: UserId,
    pub blocked_id: UserId,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct BlockUserRequest {
    pub user_id: UserId,
}
