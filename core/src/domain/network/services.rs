use tracing::info;

use crate::domain::{
    common::{
        CoreError,
        services::{Repositories, Service},
    },
    network::{
        entities::{ConnectionRequest, ConnectionRequestId, ConnectionStatus},
        ports::{ConnectionRepository, FollowRepository, NetworkService},
    },
    notification::{
        entities::{NewNotification, NotificationType},
        ports::NotificationService,
    },
    user::{
        entities::{UserId, UserSummary},
        ports::UserRepository,
    },
};

impl<R> Service<R>
where
    R: Repositories,
{
    /// Loads a request and checks that `acting_user` is the one it was sent to and that it is
    /// still waiting for an answer.
    async fn pending_request_for(
        &self,
        request_id: &ConnectionRequestId,
        acting_user: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        let request = self
            .repositories
            .connections()
            .find_request(request_id)
            .await?
            .ok_or_else(|| CoreError::validation("Connection request not found"))?;

        if &request.receiver_id != acting_user {
            return Err(CoreError::validation(
                "You can only respond to requests sent to you",
            ));
        }

        if !request.is_pending() {
            return Err(CoreError::validation(
                "Connection request is no longer pending",
            ));
        }

        Ok(request)
    }
}

impl<R> NetworkService for Service<R>
where
    R: Repositories,
{
    async fn send_connection_request(
        &self,
        sender_id: &UserId,
        receiver_id: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        if sender_id == receiver_id {
            return Err(CoreError::validation(
                "Cannot send connection request to yourself",
            ));
        }

        self.ensure_user_exists(receiver_id).await?;

        let connections = self.repositories.connections();

        if connections.are_connected(sender_id, receiver_id).await? {
            return Err(CoreError::validation("Already connected with this user"));
        }

        if connections
            .find_pending_between(sender_id, receiver_id)
            .await?
            .is_some()
        {
            return Err(CoreError::validation("Connection request already pending"));
        }

        let request = connections.create_request(sender_id, receiver_id).await?;

        self.create_notification(NewNotification::from_actor(
            *receiver_id,
            NotificationType::ConnectionRequest,
            *sender_id,
            "You have a new connection request",
        ))
        .await?;

        Ok(request)
    }

    async fn accept_connection_request(
        &self,
        request_id: &ConnectionRequestId,
        acting_user: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        let request = self.pending_request_for(request_id, acting_user).await?;

        let accepted = self
            .repositories
            .connections()
            .set_status(&request.id, ConnectionStatus::Accepted)
            .await?;

        info!(
            request_id = %accepted.id,
            sender = %accepted.sender_id,
            receiver = %accepted.receiver_id,
            "connection request accepted"
        );

        self.create_notification(NewNotification::from_actor(
            accepted.sender_id,
            NotificationType::ConnectionAccepted,
            accepted.receiver_id,
            "Your connection request was accepted",
        ))
        .await?;

        Ok(accepted)
    }

    async fn reject_connection_request(
        &self,
        request_id: &ConnectionRequestId,
        acting_user: &UserId,
    ) -> Result<ConnectionRequest, CoreError> {
        let request = self.pending_request_for(request_id, acting_user).await?;

        self.repositories
            .connections()
            .set_status(&request.id, ConnectionStatus::Rejected)
            .await
    }

    async fn get_pending_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConnectionRequest>, CoreError> {
        self.repositories.connections().list_pending(user_id).await
    }

    async fn get_connections(&self, user_id: &UserId) -> Result<Vec<UserSummary>, CoreError> {
        let ids = self
            .repositories
            .connections()
            .list_connection_ids(user_id)
            .await?;
        self.repositories.users().find_summaries(&ids).await
    }

    async fn remove_connection(&self, user_id: &UserId, other_id: &UserId) -> Result<(), CoreError> {
        let connections = self.repositories.connections();

        if !connections.are_connected(user_id, other_id).await? {
            return Err(CoreError::validation("Not connected with this user"));
        }

        connections.remove_connection(user_id, other_id).await?;
        Ok(())
    }

    async fn follow_user(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, CoreError> {
        if follower_id == following_id {
            return Err(CoreError::validation("Cannot follow yourself"));
        }

        self.ensure_user_exists(following_id).await?;

        let followed = self
            .repositories
            .follows()
            .follow(follower_id, following_id)
            .await?;

        if followed {
            self.create_notification(NewNotification::from_actor(
                *following_id,
                NotificationType::NewFollower,
                *follower_id,
                "You have a new follower",
            ))
            .await?;
        }

        Ok(followed)
    }

    async fn unfollow_user(
        &self,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool, CoreError> {
        self.repositories
            .follows()
            .unfollow(follower_id, following_id)
            .await
    }

    async fn get_followers(&self, user_id: &UserId) -> Result<Vec<UserSummary>, CoreError> {
        let ids = self.repositories.follows().list_follower_ids(user_id).await?;
        self.repositories.users().find_summaries(&ids).await
    }

    async fn get_following(&self, user_id: &UserId) -> Result<Vec<UserSummary>, CoreError> {
        let ids = self
            .repositories
            .follows()
            .list_following_ids(user_id)
            .await?;
        self.repositories.users().find_summaries(&ids).await
    }
}
