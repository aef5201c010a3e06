use sqlx::{PgPool, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        common::CoreError,
        network::{
            entities::{ConnectionRequest, ConnectionRequestId, ConnectionStatus},
            ports::{ConnectionRepository, FollowRepository},
        },
        user::entities::UserId,
    },
    infrastructure::database_error,
};

const REQUEST_COLUMNS: &str = "id, sender_id, receiver_id, status, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresConnectionRepository {
    pool: PgPool,
}

impl PostgresConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ConnectionRepository for PostgresConnectionRepository {
    async fn create_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        query_as::<_, ConnectionRequest>(&format!(
            r#"
            INSERT INTO connection_requests (id, sender_id, receiver_id)
            VALUES ($1, $2, $3)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(sender_id.0)
        .bind(receiver_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match error {
            // connection_requests_live_pair_key: a concurrent request for the same pair won
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CoreError::validation("Connection request already pending")
            }
            other => database_error(other),
        })
    }

    async fn find_request(
        &self,
        id: &ConnectionRequestId,
    ) -> Result<Option<ConnectionRequest>, CoreError> {
        query_as::<_, ConnectionRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_requests WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<ConnectionRequest>, CoreError> {
        query_as::<_, ConnectionRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM connection_requests
            WHERE status = 'pending'
              AND ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
            LIMIT 1
            "#
        ))
        .bind(a.0)
        .bind(b.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn set_status(
        &self,
        id: &ConnectionRequestId,
        status: ConnectionStatus,
    ) -> Result<ConnectionRequest, CoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let current = sqlx::query_scalar::<_, ConnectionStatus>(
            "SELECT status FROM connection_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?
        .ok_or_else(|| CoreError::validation("Connection request not found"))?;

        if current != ConnectionStatus::Pending {
            return Err(CoreError::validation(
                "Connection request is no longer pending",
            ));
        }

        let request = query_as::<_, ConnectionRequest>(&format!(
            r#"
            UPDATE connection_requests SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        Ok(request)
    }

    async fn list_pending(&self, receiver_id: &UserId) -> Result<Vec<ConnectionRequest>, CoreError> {
        query_as::<_, ConnectionRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM connection_requests
            WHERE receiver_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#
        ))
        .bind(receiver_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn are_connected(&self, a: &UserId, b: &UserId) -> Result<bool, CoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM connection_requests
                WHERE status = 'accepted'
                  AND ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
            )
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_connection_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        sqlx::query_scalar::<_, UserId>(
            r#"
            SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END
            FROM connection_requests
            WHERE status = 'accepted' AND (sender_id = $1 OR receiver_id = $1)
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn remove_connection(&self, a: &UserId, b: &UserId) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM connection_requests
            WHERE status = 'accepted'
              AND ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
            "#,
        )
        .bind(a.0)
        .bind(b.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower_id.0)
        .bind(following_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn unfollow(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, CoreError> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id.0)
                .bind(following_id.0)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT follower_id FROM follows WHERE following_id = $1 ORDER BY created_at",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_following_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT following_id FROM follows WHERE follower_id = $1 ORDER BY created_at",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }
}
