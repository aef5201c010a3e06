use tracing::debug;

use crate::domain::{
    common::{
        CoreError, GetPaginated, TotalPaginatedElements,
        services::{Repositories, Service},
    },
    notification::{
        entities::{NewNotification, Notification, NotificationId, NotificationPreference},
        ports::{NotificationRepository, NotificationService},
    },
    user::entities::UserId,
};

impl<R> NotificationService for Service<R>
where
    R: Repositories,
{
    async fn create_notification(&self, notification: NewNotification) -> Result<bool, CoreError> {
        let preferences = self.get_preferences(&notification.user_id).await?;

        if !preferences.allows(notification.kind) {
            debug!(
                recipient = %notification.user_id,
                kind = ?notification.kind,
                "notification suppressed by recipient preferences"
            );
            return Ok(false);
        }

        self.repositories.notifications().insert(notification).await?;
        Ok(true)
    }

    async fn get_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Notification>, TotalPaginatedElements), CoreError> {
        self.repositories
            .notifications()
            .list_by_user(user_id, pagination)
            .await
    }

    async fn get_unread_count(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.repositories.notifications().count_unread(user_id).await
    }

    async fn mark_as_read(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> Result<bool, CoreError> {
        self.repositories
            .notifications()
            .mark_as_read(notification_id, user_id)
            .await
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.repositories.notifications().mark_all_as_read(user_id).await
    }

    async fn get_preferences(&self, user_id: &UserId) -> Result<NotificationPreference, CoreError> {
        let stored = self
            .repositories
            .notifications()
            .find_preferences(user_id)
            .await?;

        Ok(stored.unwrap_or_else(|| NotificationPreference::default_for(*user_id)))
    }

    async fn update_preferences(
        &self,
        preferences: NotificationPreference,
    ) -> Result<NotificationPreference, CoreError> {
        self.repositories
            .notifications()
            .upsert_preferences(preferences)
            .await
    }
}
