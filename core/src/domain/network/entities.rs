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
pub struct ConnectionRequestId(pub Uuid);

impl std::fmt::Display for ConnectionRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionRequestId {
    fn from(uuid: Uuid) -> Self {
        ConnectionRequestId(uuid)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, sqlx::FromRow)]
pub struct ConnectionRequest {
    pub id: ConnectionRequestId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: ConnectionStatus,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConnectionRequest {
    pub fn is_pending(&self) -> bool {
        self.status == ConnectionStatus::Pending
    }

    /// Whether the request links `a` and `b`, in either direction.
    pub fn involves(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SendConnectionRequest {
    pub receiver_id: UserId,
}
