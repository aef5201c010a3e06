use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::{
    common::{CoreError, GetPaginated, TotalPaginatedElements, mock::lock},
    message::entities::{Block, Message, MessageId, SendMessageInput},
    user::entities::{UserId, UserSummary},
};

pub trait MessageRepository: Send + Sync {
    /// Stores the message as unread.
    fn insert(
        &self,
        input: SendMessageInput,
    ) -> impl Future<Output = Result<Message, CoreError>> + Send;

    /// Messages exchanged between the two users, in both directions, oldest first.
    fn list_conversation(
        &self,
        a: &UserId,
        b: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Message>, TotalPaginatedElements), CoreError>> + Send;

    /// Marks everything `sender_id` sent to `receiver_id` as read and returns how many rows changed.
    fn mark_as_read(
        &self,
        receiver_id: &UserId,
        sender_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn delete_conversation(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn count_unread(&self, receiver_id: &UserId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;
}

pub trait BlockedUserRepository: Send + Sync {
    /// `true` when the block is new.
    fn block(
        &self,
        blocker_id: &UserId,
        blocked_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn unblock(
        &self,
        blocker_id: &UserId,
        blocked_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Whether `blocker_id` has blocked `blocked_id`. Not symmetric.
    fn is_blocked(
        &self,
        blocker_id: &UserId,
        blocked_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn list_blocked_ids(
        &self,
        blocker_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserId>, CoreError>> + Send;
}

/// Direct messages and user blocking.
pub trait MessageService: Send + Sync {
    fn send_message(
        &self,
        input: SendMessageInput,
    ) -> impl Future<Output = Result<Message, CoreError>> + Send;

    fn get_conversation(
        &self,
        user_id: &UserId,
        other_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Message>, TotalPaginatedElements), CoreError>> + Send;

    /// Marks the messages `other_id` sent to `user_id` as read.
    fn mark_conversation_as_read(
        &self,
        user_id: &UserId,
        other_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn delete_conversation(
        &self,
        user_id: &UserId,
        other_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn get_unread_message_count(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    /// A new block also deletes the conversation between the two users.
    fn block_user(
        &self,
        blocker_id: &UserId,
        blocked_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn unblock_user(
        &self,
        blocker_id: &UserId,
        blocked_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn get_blocked_users(
        &self,
        blocker_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserSummary>, CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockMessageRepository {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MockMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageRepository for MockMessageRepository {
    async fn insert(&self, input: SendMessageInput) -> Result<Message, CoreError> {
        let mut messages = lock(&self.messages)?;
        let message = Message {
            id: MessageId::from(uuid::Uuid::new_v4()),
            sender_id: input.sender_id,
            receiver_id: input.receiver_id,
            text: input.text,
            is_read: false,
            created_at: Utc::now(),
        };
        messages.push(message.clone());
        Ok(message)
    }

    async fn list_conversation(
        &self,
        a: &UserId,
        b: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Message>, TotalPaginatedElements), CoreError> {
        let messages = lock(&self.messages)?;
        let conversation: Vec<Message> = messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        Ok(pagination.apply(conversation))
    }

    async fn mark_as_read(&self, receiver_id: &UserId, sender_id: &UserId) -> Result<u64, CoreError> {
        let mut messages = lock(&self.messages)?;
        let mut updated = 0;
        for message in messages
            .iter_mut()
            .filter(|m| &m.receiver_id == receiver_id && &m.sender_id == sender_id && !m.is_read)
        {
            message.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_conversation(&self, a: &UserId, b: &UserId) -> Result<u64, CoreError> {
        let mut messages = lock(&self.messages)?;
        let count_before = messages.len();
        messages.retain(|m| !m.is_between(a, b));
        Ok((count_before - messages.len()) as u64)
    }

    async fn count_unread(&self, receiver_id: &UserId) -> Result<u64, CoreError> {
        let messages = lock(&self.messages)?;
        Ok(messages
            .iter()
            .filter(|m| &m.receiver_id == receiver_id && !m.is_read)
            .count() as u64)
    }
}

#[derive(Clone, Default)]
pub struct MockBlockedUserRepository {
    blocks: Arc<Mutex<Vec<Block>>>,
}

impl MockBlockedUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockedUserRepository for MockBlockedUserRepository {
    async fn block(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        let mut blocks = lock(&self.blocks)?;
        if blocks
            .iter()
            .any(|b| &b.blocker_id == blocker_id && &b.blocked_id == blocked_id)
        {
            return Ok(false);
        }
        blocks.push(Block {
            blocker_id: *blocker_id,
            blocked_id: *blocked_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn unblock(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        let mut blocks = lock(&self.blocks)?;
        let count_before = blocks.len();
        blocks.retain(|b| !(&b.blocker_id == blocker_id && &b.blocked_id == blocked_id));
        Ok(blocks.len() != count_before)
    }

    async fn is_blocked(&self, blocker_id: &UserId, blocked_id: &UserId) -> Result<bool, CoreError> {
        let blocks = lock(&self.blocks)?;
        Ok(blocks
            .iter()
            .any(|b| &b.blocker_id == blocker_id && &b.blocked_id == blocked_id))
    }

    async fn list_blocked_ids(&self, blocker_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        let blocks = lock(&self.blocks)?;
        Ok(blocks
            .iter()
            .filter(|b| &b.blocker_id == blocker_id)
            .map(|b| b.blocked_id)
            .collect())
    }
}
