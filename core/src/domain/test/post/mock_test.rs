use chrono::{Duration, Utc};

use crate::domain::{
    common::{CoreError, GetPaginated},
    network::ports::{ConnectionRepository, FollowRepository, NetworkService},
    notification::{
        entities::{NotificationPreference, NotificationType},
        ports::{NotificationRepository, NotificationService},
    },
    post::{
        entities::{CreatePostInput, FeedFilter, PostType, UpdatePostInput},
        ports::{PostRepository, PostService},
    },
    test::{mock_service, seed_user},
    user::entities::{UserId, UserType},
};

fn new_post(user_id: UserId, content: &str) -> CreatePostInput {
    CreatePostInput {
        user_id,
        content: content.to_string(),
        post_type: PostType::Text,
        scheduled_at: None,
    }
}

// == Create / update / delete ==

#[tokio::test]
async fn test_create_post_extracts_hashtags() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;

    let post = service
        .create_post(new_post(author.id, "Tea party at #Wonderland with #tea and #TEA"))
        .await?;

    assert_eq!(post.hashtags, vec!["wonderland".to_string(), "tea".to_string()]);
    assert!(post.scheduled_at.is_none());
    assert!(!post.is_pinned);

    Ok(())
}

#[tokio::test]
async fn test_create_post_length_limits() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;

    let at_limit = service
        .create_post(new_post(author.id, &"a".repeat(5000)))
        .await;
    assert!(at_limit.is_ok());

    let too_long = service
        .create_post(new_post(author.id, &"a".repeat(5001)))
        .await
        .unwrap_err();
    assert_eq!(
        too_long,
        CoreError::validation("Post content exceeds maximum length of 5000 characters")
    );
    assert!(too_long.to_string().contains("5000"));

    let blank = service.create_post(new_post(author.id, "   ")).await;
    assert_eq!(
        blank.unwrap_err(),
        CoreError::validation("Post content cannot be empty")
    );

    Ok(())
}

#[tokio::test]
async fn test_create_post_notifies_followers() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Creator).await?;
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;
    let muted_fan = seed_user(&repositories, "carol", UserType::Personal).await?;

    repositories.follows.follow(&fan.id, &author.id).await?;
    repositories.follows.follow(&muted_fan.id, &author.id).await?;
    let mut preferences = NotificationPreference::default_for(muted_fan.id);
    preferences.new_posts = false;
    repositories
        .notifications
        .upsert_preferences(preferences)
        .await?;

    service.create_post(new_post(author.id, "hello")).await?;

    let (fan_notifications, _) = service
        .get_notifications(&fan.id, &GetPaginated::default())
        .await?;
    assert_eq!(fan_notifications.len(), 1);
    assert_eq!(fan_notifications[0].kind, NotificationType::NewPost);

    let (muted, _) = service
        .get_notifications(&muted_fan.id, &GetPaginated::default())
        .await?;
    assert!(muted.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_require_ownership() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let stranger = seed_user(&repositories, "bob", UserType::Personal).await?;
    let post = service.create_post(new_post(author.id, "first")).await?;

    let edit = |user_id: UserId| UpdatePostInput {
        post_id: post.id,
        user_id,
        content: "edited #now".to_string(),
        post_type: Some(PostType::Announcement),
    };

    assert_eq!(
        service.update_post(edit(stranger.id)).await.unwrap_err(),
        CoreError::validation("You can only edit your own posts")
    );

    let updated = service.update_post(edit(author.id)).await?;
    assert_eq!(updated.content, "edited #now");
    assert_eq!(updated.hashtags, vec!["now".to_string()]);
    assert_eq!(updated.post_type, PostType::Announcement);
    assert!(updated.updated_at.is_some());

    assert_eq!(
        service.delete_post(&post.id, &stranger.id).await.unwrap_err(),
        CoreError::validation("You can only delete your own posts")
    );

    service.delete_post(&post.id, &author.id).await?;
    assert_eq!(
        service.get_post(&post.id, &author.id).await.unwrap_err(),
        CoreError::validation("Post not found")
    );

    Ok(())
}

// == Feed ==

#[tokio::test]
async fn test_feed_includes_self_followed_and_connections() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, repositories) = mock_service();
    let me = seed_user(&repositories, "alice", UserType::Personal).await?;
    let followed = seed_user(&repositories, "bob", UserType::Creator).await?;
    let friend = seed_user(&repositories, "carol", UserType::Business).await?;
    let stranger = seed_user(&repositories, "dave", UserType::Personal).await?;

    repositories.follows.follow(&me.id, &followed.id).await?;
    let request = service.send_connection_request(&friend.id, &me.id).await?;
    service.accept_connection_request(&request.id, &me.id).await?;

    service.create_post(new_post(me.id, "mine")).await?;
    service.create_post(new_post(followed.id, "followed")).await?;
    service
        .create_post(CreatePostInput {
            post_type: PostType::Promotional,
            ..new_post(friend.id, "friend promo")
        })
        .await?;
    service.create_post(new_post(stranger.id, "stranger")).await?;
    service
        .schedule_post(CreatePostInput {
            scheduled_at: Some(Utc::now() + Duration::hours(2)),
            ..new_post(followed.id, "not yet")
        })
        .await?;

    let (feed, total) = service.get_feed(&me.id, &GetPaginated::default()).await?;
    assert_eq!(total, 3);
    let contents: Vec<&str> = feed.iter().map(|p| p.content.as_str()).collect();
    assert!(contents.contains(&"mine"));
    assert!(contents.contains(&"followed"));
    assert!(contents.contains(&"friend promo"));

    let (promos, _) = service
        .get_filtered_feed(
            &me.id,
            &FeedFilter {
                post_type: Some(PostType::Promotional),
                user_type: None,
            },
            &GetPaginated::default(),
        )
        .await?;
    assert_eq!(promos.len(), 1);
    assert_eq!(promos[0].user_id, friend.id);

    let (creators, _) = service
        .get_filtered_feed(
            &me.id,
            &FeedFilter {
                post_type: None,
                user_type: Some(UserType::Creator),
            },
            &GetPaginated::default(),
        )
        .await?;
    assert_eq!(creators.len(), 1);
    assert_eq!(creators[0].content, "followed");

    Ok(())
}

#[tokio::test]
async fn test_trending_orders_by_engagement() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;

    // The engaged post is the older one, so recency alone would rank it last.
    let popular = service.create_post(new_post(author.id, "popular")).await?;
    let quiet = service.create_post(new_post(author.id, "quiet")).await?;

    service.like_post(&popular.id, &fan.id).await?;
    service.comment_on_post(&popular.id, &fan.id, "wow").await?;
    service.share_post(&popular.id, &fan.id).await?;

    let trending = service.get_trending_posts(None).await?;
    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].id, popular.id);
    assert_eq!(trending[1].id, quiet.id);

    let top_one = service.get_trending_posts(Some(0)).await?;
    assert_eq!(top_one.len(), 1, "limit is clamped to at least one");

    Ok(())
}

#[tokio::test]
async fn test_search_by_hashtag() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;

    service
        .create_post(new_post(author.id, "off to the #TeaParty"))
        .await?;
    service.create_post(new_post(author.id, "no tags here")).await?;

    let (found, total) = service
        .search_by_hashtag("#teaparty", &GetPaginated::default())
        .await?;
    assert_eq!(total, 1);
    assert_eq!(found[0].content, "off to the #TeaParty");

    assert_eq!(
        service
            .search_by_hashtag("#", &GetPaginated::default())
            .await
            .unwrap_err(),
        CoreError::validation("Hashtag cannot be empty")
    );

    Ok(())
}

// == Likes, comments, shares ==

#[tokio::test]
async fn test_like_notifies_author_once() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;
    let post = service.create_post(new_post(author.id, "like me")).await?;

    assert!(service.like_post(&post.id, &fan.id).await?);
    assert!(!service.like_post(&post.id, &fan.id).await?, "second like is a no-op");
    assert!(service.like_post(&post.id, &author.id).await?);

    let (notifications, _) = service
        .get_notifications(&author.id, &GetPaginated::default())
        .await?;
    let likes: Vec<_> = notifications
        .iter()
        .filter(|n| n.kind == NotificationType::Like)
        .collect();
    assert_eq!(likes.len(), 1, "exactly one LIKE, none for self-likes");
    assert_eq!(likes[0].related_user_id, Some(fan.id));
    assert_eq!(likes[0].related_post_id, Some(post.id));

    assert!(service.unlike_post(&post.id, &fan.id).await?);
    assert!(!service.unlike_post(&post.id, &fan.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_like_respects_disabled_preference() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;
    let post = service.create_post(new_post(author.id, "quiet please")).await?;

    let mut preferences = NotificationPreference::default_for(author.id);
    preferences.likes = false;
    service.update_preferences(preferences).await?;

    assert!(service.like_post(&post.id, &fan.id).await?);
    assert_eq!(service.get_unread_count(&author.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_like_unknown_post() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;

    let result = service
        .like_post(&uuid::Uuid::new_v4().into(), &fan.id)
        .await;
    assert_eq!(result.unwrap_err(), CoreError::validation("Post not found"));

    Ok(())
}

#[tokio::test]
async fn test_comments() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let commenter = seed_user(&repositories, "bob", UserType::Personal).await?;
    let stranger = seed_user(&repositories, "carol", UserType::Personal).await?;
    let post = service.create_post(new_post(author.id, "discuss")).await?;

    assert_eq!(
        service
            .comment_on_post(&post.id, &commenter.id, " ")
            .await
            .unwrap_err(),
        CoreError::validation("Comment cannot be empty")
    );
    assert_eq!(
        service
            .comment_on_post(&post.id, &commenter.id, &"x".repeat(1001))
            .await
            .unwrap_err(),
        CoreError::validation("Comment exceeds maximum length of 1000 characters")
    );

    let first = service
        .comment_on_post(&post.id, &commenter.id, "first!")
        .await?;
    let second = service
        .comment_on_post(&post.id, &commenter.id, "second")
        .await?;

    let (comments, total) = service
        .get_comments(&post.id, &GetPaginated::default())
        .await?;
    assert_eq!(total, 2);
    assert_eq!(comments[0].id, first.id, "oldest first");

    assert_eq!(
        service
            .delete_comment(&first.id, &stranger.id)
            .await
            .unwrap_err(),
        CoreError::validation("You can only delete your own comments")
    );
    service.delete_comment(&first.id, &commenter.id).await?;
    service.delete_comment(&second.id, &author.id).await?;
    assert_eq!(
        service
            .delete_comment(&second.id, &author.id)
            .await
            .unwrap_err(),
        CoreError::validation("Comment not found")
    );

    let (notifications, _) = service
        .get_notifications(&author.id, &GetPaginated::default())
        .await?;
    assert_eq!(
        notifications
            .iter()
            .filter(|n| n.kind == NotificationType::Comment)
            .count(),
        2
    );

    Ok(())
}

#[tokio::test]
async fn test_share_and_analytics() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let fan = seed_user(&repositories, "bob", UserType::Personal).await?;
    let post = service.create_post(new_post(author.id, "share me")).await?;

    let share = service.share_post(&post.id, &fan.id).await?;
    assert_eq!(share.post_id, post.id);
    service.share_post(&post.id, &fan.id).await?;
    service.like_post(&post.id, &fan.id).await?;

    let analytics = service.get_analytics(&post.id).await?;
    assert_eq!(analytics.likes, 1);
    assert_eq!(analytics.comments, 0);
    assert_eq!(analytics.shares, 2);
    assert_eq!(analytics.engagement(), 3);

    Ok(())
}

// == Scheduling & pinning ==

#[tokio::test]
async fn test_schedule_post_validation() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let reader = seed_user(&repositories, "bob", UserType::Personal).await?;

    assert_eq!(
        service
            .schedule_post(new_post(author.id, "when?"))
            .await
            .unwrap_err(),
        CoreError::validation("Scheduled time cannot be null")
    );
    assert_eq!(
        service
            .schedule_post(CreatePostInput {
                scheduled_at: Some(Utc::now() - Duration::minutes(1)),
                ..new_post(author.id, "yesterday")
            })
            .await
            .unwrap_err(),
        CoreError::validation("Scheduled time must be in the future")
    );

    let scheduled = service
        .schedule_post(CreatePostInput {
            scheduled_at: Some(Utc::now() + Duration::days(1)),
            ..new_post(author.id, "tomorrow")
        })
        .await?;
    assert!(!scheduled.is_published(Utc::now()));

    assert_eq!(service.get_post(&scheduled.id, &author.id).await?.id, scheduled.id);
    assert_eq!(
        service
            .get_post(&scheduled.id, &reader.id)
            .await
            .unwrap_err(),
        CoreError::validation("Post not found"),
        "hidden from others until published"
    );

    let (mine, _) = service
        .get_my_posts(&author.id, &GetPaginated::default())
        .await?;
    assert_eq!(mine.len(), 1, "the author still sees scheduled posts");

    Ok(())
}

#[tokio::test]
async fn test_pin_post_unpins_others() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let author = seed_user(&repositories, "alice", UserType::Personal).await?;
    let stranger = seed_user(&repositories, "bob", UserType::Personal).await?;
    let first = service.create_post(new_post(author.id, "first")).await?;
    let second = service.create_post(new_post(author.id, "second")).await?;

    assert_eq!(
        service.pin_post(&first.id, &stranger.id).await.unwrap_err(),
        CoreError::validation("You can only pin your own posts")
    );

    service.pin_post(&first.id, &author.id).await?;
    let pinned = service.pin_post(&second.id, &author.id).await?;
    assert!(pinned.is_pinned);

    let first_now = repositories
        .posts
        .find_by_id(&first.id)
        .await?
        .ok_or("post disappeared")?;
    assert!(!first_now.is_pinned);

    let (mine, _) = service
        .get_my_posts(&author.id, &GetPaginated::default())
        .await?;
    assert_eq!(mine[0].id, second.id, "pinned post comes first");

    Ok(())
}

#[tokio::test]
async fn test_connection_listing_is_used_by_feed() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let me = seed_user(&repositories, "alice", UserType::Personal).await?;
    let friend = seed_user(&repositories, "bob", UserType::Personal).await?;

    let request = repositories
        .connections
        .create_request(&me.id, &friend.id)
        .await?;
    service.create_post(new_post(friend.id, "pending")).await?;

    let (before, _) = service.get_feed(&me.id, &GetPaginated::default()).await?;
    assert!(before.is_empty(), "pending requests do not share feeds");

    service
        .accept_connection_request(&request.id, &friend.id)
        .await?;
    let (after, _) = service.get_feed(&me.id, &GetPaginated::default()).await?;
    assert_eq!(after.len(), 1);

    Ok(())
}
