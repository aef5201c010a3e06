use crate::domain::{
    common::{CoreError, GetPaginated},
    message::{entities::SendMessageInput, ports::MessageService},
    test::{mock_service, seed_user},
    user::entities::{UserId, UserType},
};

fn message(sender_id: UserId, receiver_id: UserId, text: &str) -> SendMessageInput {
    SendMessageInput {
        sender_id,
        receiver_id,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_send_and_read_conversation() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    service.send_message(message(alice.id, bob.id, "hi bob")).await?;
    service.send_message(message(bob.id, alice.id, "hi alice")).await?;
    service.send_message(message(alice.id, bob.id, "how are you?")).await?;

    let (conversation, total) = service
        .get_conversation(&bob.id, &alice.id, &GetPaginated::default())
        .await?;
    assert_eq!(total, 3);
    let texts: Vec<&str> = conversation.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["hi bob", "hi alice", "how are you?"]);
    assert!(conversation.iter().all(|m| !m.is_read));

    assert_eq!(service.get_unread_message_count(&bob.id).await?, 2);
    assert_eq!(service.mark_conversation_as_read(&bob.id, &alice.id).await?, 2);
    assert_eq!(service.get_unread_message_count(&bob.id).await?, 0);
    assert_eq!(service.get_unread_message_count(&alice.id).await?, 1);

    assert_eq!(service.delete_conversation(&alice.id, &bob.id).await?, 3);
    let (empty, _) = service
        .get_conversation(&alice.id, &bob.id, &GetPaginated::default())
        .await?;
    assert!(empty.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_send_message_validation_order() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    assert_eq!(
        service
            .send_message(message(alice.id, alice.id, "me"))
            .await
            .unwrap_err(),
        CoreError::validation("Cannot send message to yourself")
    );
    assert_eq!(
        service
            .send_message(message(alice.id, uuid::Uuid::new_v4().into(), "anyone?"))
            .await
            .unwrap_err(),
        CoreError::validation("User not found")
    );
    assert_eq!(
        service
            .send_message(message(alice.id, bob.id, "  "))
            .await
            .unwrap_err(),
        CoreError::validation("Message cannot be empty")
    );
    assert_eq!(
        service
            .send_message(message(alice.id, bob.id, &"z".repeat(1001)))
            .await
            .unwrap_err(),
        CoreError::validation("Message exceeds maximum length of 1000 characters")
    );

    Ok(())
}

#[tokio::test]
async fn test_blocking() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    service.send_message(message(alice.id, bob.id, "hello")).await?;

    assert_eq!(
        service.block_user(&alice.id, &alice.id).await.unwrap_err(),
        CoreError::validation("Cannot block yourself")
    );

    assert!(service.block_user(&bob.id, &alice.id).await?);
    assert!(!service.block_user(&bob.id, &alice.id).await?, "already blocked");

    let (conversation, _) = service
        .get_conversation(&alice.id, &bob.id, &GetPaginated::default())
        .await?;
    assert!(conversation.is_empty(), "a new block clears the conversation");

    assert_eq!(
        service
            .send_message(message(alice.id, bob.id, "please?"))
            .await
            .unwrap_err(),
        CoreError::validation("You have been blocked by this user")
    );
    assert_eq!(
        service
            .send_message(message(bob.id, alice.id, "bye"))
            .await
            .unwrap_err(),
        CoreError::validation("You have blocked this user. Unblock to send messages")
    );

    let blocked = service.get_blocked_users(&bob.id).await?;
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].username, "alice");

    assert!(service.unblock_user(&bob.id, &alice.id).await?);
    assert!(!service.unblock_user(&bob.id, &alice.id).await?);
    service.send_message(message(bob.id, alice.id, "sorry")).await?;

    Ok(())
}

#[tokio::test]
async fn test_block_unknown_user() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let stranger = UserId::from(uuid::Uuid::new_v4());

    assert_eq!(
        service.block_user(&alice.id, &stranger).await.unwrap_err(),
        CoreError::validation("User not found")
    );
    assert!(service.get_blocked_users(&alice.id).await?.is_empty());

    Ok(())
}
