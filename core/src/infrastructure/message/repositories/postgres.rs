use sqlx::{PgPool, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        common::{CoreError, GetPaginated, TotalPaginatedElements},
        message::{
            entities::{Message, SendMessageInput},
            ports::{BlockedUserRepository, MessageRepository},
        },
        user::entities::UserId,
    },
    infrastructure::database_error,
};

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PostgresMessageRepository {
    async fn insert(&self, input: SendMessageInput) -> Result<Message, CoreError> {
        query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, receiver_id, text, is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.sender_id.0)
        .bind(input.receiver_id.0)
        .bind(&input.text)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_conversation(
        &self,
        a: &UserId,
        b: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Message>, TotalPaginatedElements), CoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        let messages = query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, text, is_read, created_at
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((messages, total as TotalPaginatedElements))
    }

    async fn mark_as_read(&self, receiver_id: &UserId, sender_id: &UserId) -> Result<u64, CoreError> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND NOT is_read
            "#,
        )
        .bind(receiver_id.0)
        .bind(sender_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_conversation(&self, a: &UserId, b: &UserId) -> Result<u64, CoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn count_unread(&self, receiver_id: &UserId) -> Result<u64, CoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND NOT is_read",
        )
        .bind(receiver_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(count as u64)
    }
}

#[derive(Clone)]
pub struct PostgresBlockedUserRepository {
    pool: PgPool,
}

impl PostgresBlockedUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BlockedUserRepository for PostgresBlockedUserRepository {
    async fn block(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO blocked_users (blocker_id, blocked_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(blocker_id.0)
        .bind(blocked_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn unblock(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        let result =
            sqlx::query("DELETE FROM blocked_users WHERE blocker_id = $1 AND blocked_id = $2")
                .bind(blocker_id.0)
                .bind(blocked_id.0)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_blocked(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blocked_users WHERE blocker_id = $1 AND blocked_id = $2
            )
            "#,
        )
        .bind(blocker_id.0)
        .bind(blocked_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_blocked_ids(&self, blocker_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT blocked_id FROM blocked_users WHERE blocker_id = $1 ORDER BY created_at",
        )
        .bind(blocker_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }
}
