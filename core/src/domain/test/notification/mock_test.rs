use crate::domain::{
    common::GetPaginated,
    notification::{
        entities::{NewNotification, NotificationPreference, NotificationType},
        ports::NotificationService,
    },
    test::{mock_service, seed_user},
    user::entities::UserType,
};

#[tokio::test]
async fn test_preferences_default_to_everything_on() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;

    let preferences = service.get_preferences(&alice.id).await?;
    assert_eq!(preferences, NotificationPreference::default_for(alice.id));

    Ok(())
}

#[tokio::test]
async fn test_create_notification_is_gated_by_preferences() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    let mut preferences = NotificationPreference::default_for(alice.id);
    preferences.new_followers = false;
    let stored = service.update_preferences(preferences.clone()).await?;
    assert_eq!(stored, preferences);
    assert_eq!(service.get_preferences(&alice.id).await?, preferences);

    let suppressed = service
        .create_notification(NewNotification::from_actor(
            alice.id,
            NotificationType::NewFollower,
            bob.id,
            "You have a new follower",
        ))
        .await?;
    assert!(!suppressed);

    let stored = service
        .create_notification(NewNotification::from_actor(
            alice.id,
            NotificationType::Share,
            bob.id,
            "Someone shared your post",
        ))
        .await?;
    assert!(stored);

    let (notifications, total) = service
        .get_notifications(&alice.id, &GetPaginated::default())
        .await?;
    assert_eq!(total, 1);
    assert_eq!(notifications[0].kind, NotificationType::Share);

    Ok(())
}

#[tokio::test]
async fn test_mark_as_read_is_scoped_to_recipient() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let alice = seed_user(&repositories, "alice", UserType::Personal).await?;
    let bob = seed_user(&repositories, "bob", UserType::Personal).await?;

    for message in ["one", "two", "three"] {
        service
            .create_notification(NewNotification::from_actor(
                alice.id,
                NotificationType::Like,
                bob.id,
                message,
            ))
            .await?;
    }
    assert_eq!(service.get_unread_count(&alice.id).await?, 3);

    let (notifications, _) = service
        .get_notifications(&alice.id, &GetPaginated::default())
        .await?;
    assert_eq!(notifications[0].message, "three", "newest first");

    let target = notifications[0].id;
    assert!(!service.mark_as_read(&target, &bob.id).await?);
    assert!(service.mark_as_read(&target, &alice.id).await?);
    assert_eq!(service.get_unread_count(&alice.id).await?, 2);

    assert_eq!(service.mark_all_as_read(&alice.id).await?, 2);
    assert_eq!(service.mark_all_as_read(&alice.id).await?, 0);
    assert_eq!(service.get_unread_count(&alice.id).await?, 0);

    Ok(())
}
