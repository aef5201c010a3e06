use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::{
    common::{CoreError, mock::lock},
    network::entities::{ConnectionRequest, ConnectionRequestId, ConnectionStatus},
    user::entities::{UserId, UserSummary},
};

pub trait ConnectionRepository: Send + Sync {
    fn create_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> impl Future<Output = Result<ConnectionRequest, CoreError>> + Send;

    fn find_request(
        &self,
        id: &ConnectionRequestId,
    ) -> impl Future<Output = Result<Option<ConnectionRequest>, CoreError>> + Send;

    /// A pending request between the two users, whichever of them sent it.
    fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl Future<Output = Result<Option<ConnectionRequest>, CoreError>> + Send;

    /// Moves a pending request to `status`. Fails if the request is no longer pending.
    fn set_status(
        &self,
        id: &ConnectionRequestId,
        status: ConnectionStatus,
    ) -> impl Future<Output = Result<ConnectionRequest, CoreError>> + Send;

    /// Pending requests received by the user, newest first.
    fn list_pending(
        &self,
        receiver_id: &UserId,
    ) -> impl Future<Output = Result<Vec<ConnectionRequest>, CoreError>> + Send;

    fn are_connected(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Ids of everyone the user has an accepted request with.
    fn list_connection_ids(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserId>, CoreError>> + Send;

    /// Deletes the accepted request between the two users. `true` when something was deleted.
    fn remove_connection(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

pub trait FollowRepository: Send + Sync {
    /// `true` when the follow is new.
    fn follow(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn unfollow(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn list_follower_ids(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserId>, CoreError>> + Send;

    fn list_following_ids(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserId>, CoreError>> + Send;
}

/// Connections (mutual, request based) and follows (one-way).
pub trait NetworkService: Send + Sync {
    fn send_connection_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> impl Future<Output = Result<ConnectionRequest, CoreError>> + Send;

    /// Only the receiver of a pending request may accept it.
    fn accept_connection_request(
        &self,
        request_id: &ConnectionRequestId,
        acting_user: &UserId,
    ) -> impl Future<Output = Result<ConnectionRequest, CoreError>> + Send;

    fn reject_connection_request(
        &self,
        request_id: &ConnectionRequestId,
        acting_user: &UserId,
    ) -> impl Future<Output = Result<ConnectionRequest, CoreError>> + Send;

    fn get_pending_requests(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<ConnectionRequest>, CoreError>> + Send;

    fn get_connections(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserSummary>, CoreError>> + Send;

    fn remove_connection(
        &self,
        user_id: &UserId,
        other_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn follow_user(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn unfollow_user(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn get_followers(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserSummary>, CoreError>> + Send;

    fn get_following(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<UserSummary>, CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockConnectionRepository {
    requests: Arc<Mutex<Vec<ConnectionRequest>>>,
}

impl MockConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectionRepository for MockConnectionRepository {
    async fn create_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        let mut requests = lock(&self.requests)?;

        let live_pair = requests.iter().any(|r| {
            r.involves(sender_id, receiver_id) && r.status != ConnectionStatus::Rejected
        });
        if live_pair {
            return Err(CoreError::validation("Connection request already pending"));
        }

        let request = ConnectionRequest {
            id: ConnectionRequestId::from(uuid::Uuid::new_v4()),
            sender_id: *sender_id,
            receiver_id: *receiver_id,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        requests.push(request.clone());
        Ok(request)
    }

    async fn find_request(
        &self,
        id: &ConnectionRequestId,
    ) -> Result<Option<ConnectionRequest>, CoreError> {
        let requests = lock(&self.requests)?;
        Ok(requests.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_pending_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<ConnectionRequest>, CoreError> {
        let requests = lock(&self.requests)?;
        Ok(requests
            .iter()
            .find(|r| r.is_pending() && r.involves(a, b))
            .cloned())
    }

    async fn set_status(
        &self,
        id: &ConnectionRequestId,
        status: ConnectionStatus,
    ) -> Result<ConnectionRequest, CoreError> {
        let mut requests = lock(&self.requests)?;
        let request = requests
            .iter_mut()
            .find(|r| &r.id == id && r.is_pending())
            .ok_or_else(|| CoreError::validation("Connection request is no longer pending"))?;
        request.status = status;
        request.updated_at = Some(Utc::now());
        Ok(request.clone())
    }

    async fn list_pending(&self, receiver_id: &UserId) -> Result<Vec<ConnectionRequest>, CoreError> {
        let requests = lock(&self.requests)?;
        Ok(requests
            .iter()
            .rev()
            .filter(|r| &r.receiver_id == receiver_id && r.is_pending())
            .cloned()
            .collect())
    }

    async fn are_connected(&self, a: &UserId, b: &UserId) -> Result<bool, CoreError> {
        let requests = lock(&self.requests)?;
        Ok(requests
            .iter()
            .any(|r| r.status == ConnectionStatus::Accepted && r.involves(a, b)))
    }

    async fn list_connection_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        let requests = lock(&self.requests)?;
        Ok(requests
            .iter()
            .filter(|r| r.status == ConnectionStatus::Accepted)
            .filter_map(|r| {
                if &r.sender_id == user_id {
                    Some(r.receiver_id)
                } else if &r.receiver_id == user_id {
                    Some(r.sender_id)
                } else {
                    None
                }
            })
            .collect())
    }

    async fn remove_connection(&self, a: &UserId, b: &UserId) -> Result<bool, CoreError> {
        let mut requests = lock(&self.requests)?;
        let count_before = requests.len();
        requests.retain(|r| !(r.status == ConnectionStatus::Accepted && r.involves(a, b)));
        Ok(requests.len() != count_before)
    }
}

#[derive(Clone, Default)]
pub struct MockFollowRepository {
    follows: Arc<Mutex<Vec<(UserId, UserId)>>>,
}

impl MockFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FollowRepository for MockFollowRepository {
    async fn follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool, CoreError> {
        let mut follows = lock(&self.follows)?;
        let edge = (*follower_id, *following_id);
        if follows.contains(&edge) {
            return Ok(false);
        }
        follows.push(edge);
        Ok(true)
    }

    async fn unfollow(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, CoreError> {
        let mut follows = lock(&self.follows)?;
        let count_before = follows.len();
        follows.retain(|(f, t)| !(f == follower_id && t == following_id));
        Ok(follows.len() != count_before)
    }

    async fn list_follower_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        let follows = lock(&self.follows)?;
        Ok(follows
            .iter()
            .filter(|(_, following)| following == user_id)
            .map(|(follower, _)| *follower)
            .collect())
    }

    async fn list_following_ids(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        let follows = lock(&self.follows)?;
        Ok(follows
            .iter()
            .filter(|(follower, _)| follower == user_id)
            .map(|(_, following)| *following)
            .collect())
    }
}
