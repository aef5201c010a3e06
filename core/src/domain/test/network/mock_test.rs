use crate::domain::{
    common::{CoreError, GetPaginated},
    network::{
        entities::ConnectionStatus,
        ports::{ConnectionRepository, NetworkService},
    },
    notification::{entities::NotificationType, ports::NotificationService},
    test::{mock_service, seed_user},
    user::entities::UserType,
};

// == Connection requests ==

#[tokio::test]
async fn test_connection_request_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    let request = service.send_connection_request(&alice.id, &bob.id).await?;
    assert_eq!(request.status, ConnectionStatus::Pending);

    let pending = service.get_pending_requests(&bob.id).await?;
    assert_eq!(pending.len(), 1);
    assert!(service.get_pending_requests(&alice.id).await?.is_empty());

    let accepted = service.accept_connection_request(&request.id, &bob.id).await?;
    assert_eq!(accepted.status, ConnectionStatus::Accepted);
    assert!(accepted.updated_at.is_some());

    let alice_connections = service.get_connections(&alice.id).await?;
    assert_eq!(alice_connections.len(), 1);
    assert_eq!(alice_connections[0].id, bob.id);
    assert_eq!(service.get_connections(&bob.id).await?[0].id, alice.id);

    let (bob_notifications, _) = service
        .get_notifications(&bob.id, &GetPaginated::default())
        .await?;
    assert_eq!(bob_notifications.len(), 1);
    assert_eq!(bob_notifications[0].kind, NotificationType::ConnectionRequest);

    let (alice_notifications, _) = service
        .get_notifications(&alice.id, &GetPaginated::default())
        .await?;
    assert_eq!(alice_notifications.len(), 1);
    assert_eq!(
        alice_notifications[0].kind,
        NotificationType::ConnectionAccepted
    );

    service.remove_connection(&bob.id, &alice.id).await?;
    assert!(service.get_connections(&alice.id).await?.is_empty());
    assert_eq!(
        service
            .remove_connection(&bob.id, &alice.id)
            .await
            .unwrap_err(),
        CoreError::validation("Not connected with this user")
    );

    Ok(())
}

#[tokio::test]
async fn test_store_rejects_second_live_request_for_pair() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    // Both inserts bypass the service checks, as two racing requests would.
    repositories
        .connections
        .create_request(&alice.id, &bob.id)
        .await?;
    let err = repositories
        .connections
        .create_request(&bob.id, &alice.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CoreError::validation("Connection request already pending")
    );

    let pending = service.get_pending_requests(&bob.id).await?;
    assert_eq!(pending.len(), 1);

    // A rejected request frees the pair again.
    service
        .reject_connection_request(&pending[0].id, &bob.id)
        .await?;
    repositories
        .connections
        .create_request(&bob.id, &alice.id)
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_send_connection_request_rejections() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    assert_eq!(
        service
            .send_connection_request(&alice.id, &alice.id)
            .await
            .unwrap_err(),
        CoreError::validation("Cannot send connection request to yourself")
    );
    assert_eq!(
        service
            .send_connection_request(&alice.id, &uuid::Uuid::new_v4().into())
            .await
            .unwrap_err(),
        CoreError::validation("User not found")
    );

    let request = service.send_connection_request(&alice.id, &bob.id).await?;

    assert_eq!(
        service
            .send_connection_request(&alice.id, &bob.id)
            .await
            .unwrap_err(),
        CoreError::validation("Connection request already pending")
    );
    assert_eq!(
        service
            .send_connection_request(&bob.id, &alice.id)
            .await
            .unwrap_err(),
        CoreError::validation("Connection request already pending"),
        "the reverse direction counts too"
    );

    service.accept_connection_request(&request.id, &bob.id).await?;
    assert_eq!(
        service
            .send_connection_request(&bob.id, &alice.id)
            .await
            .unwrap_err(),
        CoreError::validation("Already connected with this user")
    );

    Ok(())
}

#[tokio::test]
async fn test_only_receiver_can_answer_pending_requests() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    let request = service.send_connection_request(&alice.id, &bob.id).await?;

    assert_eq!(
        service
            .accept_connection_request(&request.id, &alice.id)
            .await
            .unwrap_err(),
        CoreError::validation("You can only respond to requests sent to you")
    );
    assert_eq!(
        service
            .accept_connection_request(&uuid::Uuid::new_v4().into(), &bob.id)
            .await
            .unwrap_err(),
        CoreError::validation("Connection request not found")
    );

    let rejected = service.reject_connection_request(&request.id, &bob.id).await?;
    assert_eq!(rejected.status, ConnectionStatus::Rejected);

    assert_eq!(
        service
            .accept_connection_request(&request.id, &bob.id)
            .await
            .unwrap_err(),
        CoreError::validation("Connection request is no longer pending")
    );
    assert!(service.get_connections(&bob.id).await?.is_empty());

    // A rejected request does not block a new one.
    service.send_connection_request(&alice.id, &bob.id).await?;

    Ok(())
}

// == Follows ==

#[tokio::test]
async fn test_follow_and_unfollow() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Creator).await?;

    assert_eq!(
        service.follow_user(&alice.id, &alice.id).await.unwrap_err(),
        CoreError::validation("Cannot follow yourself")
    );
    assert_eq!(
        service
            .follow_user(&alice.id, &uuid::Uuid::new_v4().into())
            .await
            .unwrap_err(),
        CoreError::validation("User not found")
    );

    assert!(service.follow_user(&alice.id, &bob.id).await?);
    assert!(!service.follow_user(&alice.id, &bob.id).await?);

    let followers = service.get_followers(&bob.id).await?;
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "alice");
    let following = service.get_following(&alice.id).await?;
    assert_eq!(following[0].username, "bob");

    let (notifications, _) = service
        .get_notifications(&bob.id, &GetPaginated::default())
        .await?;
    assert_eq!(notifications.len(), 1, "a repeated follow does not notify again");
    assert_eq!(notifications[0].kind, NotificationType::NewFollower);

    assert!(service.unfollow_user(&alice.id, &bob.id).await?);
    assert!(!service.unfollow_user(&alice.id, &bob.id).await?);
    assert!(service.get_followers(&bob.id).await?.is_empty());

    Ok(())
}
