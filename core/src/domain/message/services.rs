use tracing::info;

use crate::domain::{
    common::{
        CoreError, GetPaginated, TotalPaginatedElements,
        services::{Repositories, Service},
        validation::validate_text,
    },
    message::{
        entities::{Message, SendMessageInput},
        ports::{BlockedUserRepository, MessageRepository, MessageService},
    },
    user::{
        entities::{UserId, UserSummary},
        ports::UserRepository,
    },
};

impl<R> MessageService for Service<R>
where
    R: Repositories,
{
    async fn send_message(&self, input: SendMessageInput) -> Result<Message, CoreError> {
        if input.sender_id == input.receiver_id {
            return Err(CoreError::validation("Cannot send message to yourself"));
        }

        self.ensure_user_exists(&input.receiver_id).await?;

        let blocks = self.repositories.blocked_users();

        if blocks.is_blocked(&input.receiver_id, &input.sender_id).await? {
            return Err(CoreError::validation("You have been blocked by this user"));
        }

        if blocks.is_blocked(&input.sender_id, &input.receiver_id).await? {
            return Err(CoreError::validation(
                "You have blocked this user. Unblock to send messages",
            ));
        }

        validate_text("Message", &input.text, self.limits.max_message_length)?;

        self.repositories.messages().insert(input).await
    }

    async fn get_conversation(
        &self,
        user_id: &UserId,
        other_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Message>, TotalPaginatedElements), CoreError> {
        self.repositories
            .messages()
            .list_conversation(user_id, other_id, pagination)
            .await
    }

    async fn mark_conversation_as_read(
        &self,
        user_id: &UserId,
        other_id: &UserId,
    ) -> Result<u64, CoreError> {
        self.repositories
            .messages()
            .mark_as_read(user_id, other_id)
            .await
    }

    async fn delete_conversation(&self, user_id: &UserId, other_id: &UserId) -> Result<u64, CoreError> {
        self.repositories
            .messages()
            .delete_conversation(user_id, other_id)
            .await
    }

    async fn get_unread_message_count(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.repositories.messages().count_unread(user_id).await
    }

    async fn block_user(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        if blocker_id == blocked_id {
            return Err(CoreError::validation("Cannot block yourself"));
        }

        self.ensure_user_exists(blocked_id).await?;

        let blocked = self
            .repositories
            .blocked_users()
            .block(blocker_id, blocked_id)
            .await?;

        if blocked {
            let removed = self
                .repositories
                .messages()
                .delete_conversation(blocker_id, blocked_id)
                .await?;
            info!(
                blocker = %blocker_id,
                blocked = %blocked_id,
                removed_messages = removed,
                "user blocked"
            );
        }

        Ok(blocked)
    }

    async fn unblock_user(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        self.repositories
            .blocked_users()
            .unblock(blocker_id, blocked_id)
            .await
    }

    async fn get_blocked_users(&self, blocker_id: &UserId) -> Result<Vec<UserSummary>, CoreError> {
        let ids = self
            .repositories
            .blocked_users()
            .list_blocked_ids(blocker_id)
            .await?;
        self.repositories.users().find_summaries(&ids).await
    }
}
