use sqlx::{PgPool, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        common::{CoreError, GetPaginated, TotalPaginatedElements},
        notification::{
            entities::{NewNotification, Notification, NotificationId, NotificationPreference},
            ports::NotificationRepository,
        },
        user::entities::UserId,
    },
    infrastructure::database_error,
};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, message, is_read, related_user_id, related_post_id, created_at";

const PREFERENCE_COLUMNS: &str =
    "user_id, connection_requests, new_followers, likes, comments, shares, new_posts";

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, CoreError> {
        query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (id, user_id, kind, message, related_user_id, related_post_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(notification.user_id.0)
        .bind(notification.kind)
        .bind(&notification.message)
        .bind(notification.related_user_id.map(|id| id.0))
        .bind(notification.related_post_id.map(|id| id.0))
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Notification>, TotalPaginatedElements), CoreError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

        let notifications = query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id.0)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((notifications, total as TotalPaginatedElements))
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(count as u64)
    }

    async fn mark_as_read(&self, id: &NotificationId, user_id: &UserId) -> Result<bool, CoreError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id.0)
                .bind(user_id.0)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn find_preferences(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreference>, CoreError> {
        query_as::<_, NotificationPreference>(&format!(
            "SELECT {PREFERENCE_COLUMNS} FROM notification_preferences WHERE user_id = $1"
        ))
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn upsert_preferences(
        &self,
        preferences: NotificationPreference,
    ) -> Result<NotificationPreference, CoreError> {
        query_as::<_, NotificationPreference>(&format!(
            r#"
            INSERT INTO notification_preferences ({PREFERENCE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                connection_requests = EXCLUDED.connection_requests,
                new_followers = EXCLUDED.new_followers,
                likes = EXCLUDED.likes,
                comments = EXCLUDED.comments,
                shares = EXCLUDED.shares,
                new_posts = EXCLUDED.new_posts
            RETURNING {PREFERENCE_COLUMNS}
            "#
        ))
        .bind(preferences.user_id.0)
        .bind(preferences.connection_requests)
        .bind(preferences.new_followers)
        .bind(preferences.likes)
        .bind(preferences.comments)
        .bind(preferences.shares)
        .bind(preferences.new_posts)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }
}
