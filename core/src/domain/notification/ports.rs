use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::{
    common::{CoreError, GetPaginated, TotalPaginatedElements, mock::lock},
    notification::entities::{
        NewNotification, Notification, NotificationId, NotificationPreference,
    },
    user::entities::UserId,
};

pub trait NotificationRepository: Send + Sync {
    fn insert(
        &self,
        notification: NewNotification,
    ) -> impl Future<Output = Result<Notification, CoreError>> + Send;

    /// Newest first.
    fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Notification>, TotalPaginatedElements), CoreError>> + Send;

    fn count_unread(&self, user_id: &UserId) -> impl Future<Output = Result<u64, CoreError>> + Send;

    /// Only touches the notification if `user_id` is its recipient. `true` when a row changed.
    fn mark_as_read(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn mark_all_as_read(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn find_preferences(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<NotificationPreference>, CoreError>> + Send;

    fn upsert_preferences(
        &self,
        preferences: NotificationPreference,
    ) -> impl Future<Output = Result<NotificationPreference, CoreError>> + Send;
}

pub trait NotificationService: Send + Sync {
    /// Stores the notification unless the recipient has turned its kind off.
    /// Returns whether anything was stored.
    fn create_notification(
        &self,
        notification: NewNotification,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn get_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Notification>, TotalPaginatedElements), CoreError>> + Send;

    fn get_unread_count(&self, user_id: &UserId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn mark_as_read(
        &self,
        notification_id: &NotificationId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn mark_all_as_read(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    /// Falls back to all-enabled when nothing is stored.
    fn get_preferences(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<NotificationPreference, CoreError>> + Send;

    fn update_preferences(
        &self,
        preferences: NotificationPreference,
    ) -> impl Future<Output = Result<NotificationPreference, CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockNotificationRepository {
    notifications: Arc<Mutex<Vec<Notification>>>,
    preferences: Arc<Mutex<Vec<NotificationPreference>>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationRepository for MockNotificationRepository {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, CoreError> {
        let mut notifications = lock(&self.notifications)?;
        let stored = Notification {
            id: NotificationId::from(uuid::Uuid::new_v4()),
            user_id: notification.user_id,
            kind: notification.kind,
            message: notification.message,
            is_read: false,
            related_user_id: notification.related_user_id,
            related_post_id: notification.related_post_id,
            created_at: Utc::now(),
        };
        notifications.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Notification>, TotalPaginatedElements), CoreError> {
        let notifications = lock(&self.notifications)?;
        // Insertion order is creation order, so reversing gives newest first.
        let mine: Vec<Notification> = notifications
            .iter()
            .rev()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect();
        Ok(pagination.apply(mine))
    }

    async fn count_unread(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let notifications = lock(&self.notifications)?;
        Ok(notifications
            .iter()
            .filter(|n| &n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_as_read(&self, id: &NotificationId, user_id: &UserId) -> Result<bool, CoreError> {
        let mut notifications = lock(&self.notifications)?;
        match notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.user_id == user_id)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let mut notifications = lock(&self.notifications)?;
        let mut updated = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| &n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn find_preferences(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreference>, CoreError> {
        let preferences = lock(&self.preferences)?;
        Ok(preferences.iter().find(|p| &p.user_id == user_id).cloned())
    }

    async fn upsert_preferences(
        &self,
        preferences: NotificationPreference,
    ) -> Result<NotificationPreference, CoreError> {
        let mut stored = lock(&self.preferences)?;
        stored.retain(|p| p.user_id != preferences.user_id);
        stored.push(preferences.clone());
        Ok(preferences)
    }
}
