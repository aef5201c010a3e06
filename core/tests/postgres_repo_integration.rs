use std::str::FromStr;

use revconnect_core::domain::common::GetPaginated;
use revconnect_core::domain::message::entities::SendMessageInput;
use revconnect_core::domain::message::ports::{BlockedUserRepository, MessageRepository};
use revconnect_core::domain::network::entities::ConnectionStatus;
use revconnect_core::domain::network::ports::{ConnectionRepository, FollowRepository};
use revconnect_core::domain::notification::entities::{
    NewNotification, NotificationPreference, NotificationType,
};
use revconnect_core::domain::notification::ports::NotificationRepository;
use revconnect_core::domain::post::entities::{InsertPostInput, PostId, PostType};
use revconnect_core::domain::post::ports::{
    CommentRepository, LikeRepository, PostRepository, ShareRepository,
};
use revconnect_core::domain::user::entities::{InsertUserInput, NewProfile, User, UserType};
use revconnect_core::domain::user::ports::UserRepository;
use revconnect_core::{PostgresRepositories, create_repositories, run_migrations};
use sqlx::postgres::PgConnectOptions;
use uuid::Uuid;

/// Connects to `DATABASE_TEST_URL` and applies migrations, or returns `None` so the caller can skip.
async fn setup() -> Option<PostgresRepositories> {
    let url = std::env::var("DATABASE_TEST_URL").unwrap_or_default();
    if url.is_empty() {
        eprintln!("Skipping Postgres integration test because DATABASE_TEST_URL is not set");
        return None;
    }

    let options = PgConnectOptions::from_str(&url).expect("parse database url");
    let repositories = create_repositories(options)
        .await
        .expect("connect to postgres");
    run_migrations(&repositories).await.expect("run migrations");
    Some(repositories)
}

async fn insert_user(repositories: &PostgresRepositories, prefix: &str) -> User {
    // Unique per run since the database outlives the test.
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let username = format!("{prefix}_{suffix}");
    repositories
        .user_repository
        .insert(InsertUserInput {
            email: format!("{username}@revconnect.test"),
            username: username.clone(),
            password_hash: "hash".to_string(),
            user_type: UserType::Creator,
            profile: NewProfile {
                name: username,
                ..NewProfile::default()
            },
        })
        .await
        .expect("insert user")
}

#[tokio::test]
async fn postgres_user_and_post_flow() {
    let Some(repositories) = setup().await else {
        return;
    };

    let author = insert_user(&repositories, "author").await;
    let reader = insert_user(&repositories, "reader").await;

    let found = repositories
        .user_repository
        .find_by_email(&author.email.to_uppercase())
        .await
        .expect("find by email");
    assert_eq!(found.map(|u| u.id), Some(author.id));

    let profile = repositories
        .user_repository
        .find_profile(&author.id)
        .await
        .expect("find profile")
        .expect("profile is created with the user");
    assert_eq!(profile.name, author.username);

    let tag = format!("tag{}", &Uuid::new_v4().simple().to_string()[..8]);
    let post = repositories
        .post_repository
        .insert(InsertPostInput {
            user_id: author.id,
            content: format!("hello #{tag}"),
            post_type: PostType::Announcement,
            hashtags: vec![tag.clone()],
            scheduled_at: None,
        })
        .await
        .expect("insert post");

    let (tagged, total) = repositories
        .post_repository
        .search_by_hashtag(&tag, chrono::Utc::now(), &GetPaginated::default())
        .await
        .expect("search by hashtag");
    assert_eq!(total, 1);
    assert_eq!(tagged[0].id, post.id);

    let (feed, _) = repositories
        .post_repository
        .list_feed(
            &[author.id],
            Some(PostType::Text),
            chrono::Utc::now(),
            &GetPaginated::default(),
        )
        .await
        .expect("list feed");
    assert!(feed.is_empty(), "post type filter applies");

    assert!(repositories.like_repository.add(&post.id, &reader.id).await.expect("like"));
    assert!(!repositories.like_repository.add(&post.id, &reader.id).await.expect("like again"));
    assert_eq!(
        repositories.like_repository.count_by_post(&post.id).await.expect("count"),
        1
    );

    let pinned = repositories
        .post_repository
        .pin(&post.id, &author.id)
        .await
        .expect("pin");
    assert!(pinned.is_pinned);

    repositories.post_repository.delete(&post.id).await.expect("delete");
    assert!(
        repositories
            .post_repository
            .find_by_id(&post.id)
            .await
            .expect("find post")
            .is_none()
    );

    repositories.shutdown_pool().await;
}

#[tokio::test]
async fn postgres_trending_scores_in_the_database() {
    let Some(repositories) = setup().await else {
        return;
    };

    let author = insert_user(&repositories, "trend").await;
    let fan = insert_user(&repositories, "fan").await;

    let mut posts = Vec::new();
    for content in ["engaged", "quiet"] {
        let post = repositories
            .post_repository
            .insert(InsertPostInput {
                user_id: author.id,
                content: content.to_string(),
                post_type: PostType::Text,
                hashtags: Vec::new(),
                scheduled_at: None,
            })
            .await
            .expect("insert post");
        posts.push(post);
    }
    let (engaged, quiet) = (&posts[0], &posts[1]);

    repositories.like_repository.add(&engaged.id, &fan.id).await.expect("like");
    repositories
        .comment_repository
        .insert(&engaged.id, &fan.id, "nice")
        .await
        .expect("comment");
    repositories.share_repository.add(&engaged.id, &fan.id).await.expect("share");

    let now = chrono::Utc::now();
    let trending = repositories
        .post_repository
        .list_trending(now - chrono::Duration::days(7), now, 50)
        .await
        .expect("list trending");

    let position = |id: &PostId| trending.iter().position(|p| &p.id == id);
    let engaged_at = position(&engaged.id).expect("engaged post is trending");
    if let Some(quiet_at) = position(&quiet.id) {
        assert!(engaged_at < quiet_at, "engagement outranks recency");
    }

    for post in &posts {
        repositories.post_repository.delete(&post.id).await.expect("delete");
    }
    repositories.shutdown_pool().await;
}

#[tokio::test]
async fn postgres_connection_request_race_leaves_one_live_row() {
    let Some(repositories) = setup().await else {
        return;
    };

    let alice = insert_user(&repositories, "alice").await;
    let bob = insert_user(&repositories, "bob").await;

    let connections = &repositories.connection_repository;
    let (forward, backward) = tokio::join!(
        connections.create_request(&alice.id, &bob.id),
        connections.create_request(&bob.id, &alice.id),
    );

    let stored = [&forward, &backward].iter().filter(|r| r.is_ok()).count();
    assert_eq!(stored, 1, "exactly one request per pair is stored");
    let err = forward.err().or(backward.err()).expect("one request is refused");
    assert_eq!(
        err,
        revconnect_core::CoreError::validation("Connection request already pending")
    );

    repositories.shutdown_pool().await;
}

#[tokio::test]
async fn postgres_network_message_and_notification_flow() {
    let Some(repositories) = setup().await else {
        return;
    };

    let alice = insert_user(&repositories, "alice").await;
    let bob = insert_user(&repositories, "bob").await;

    // Connections
    let request = repositories
        .connection_repository
        .create_request(&alice.id, &bob.id)
        .await
        .expect("create request");
    assert!(
        repositories
            .connection_repository
            .find_pending_between(&bob.id, &alice.id)
            .await
            .expect("find pending")
            .is_some()
    );
    let accepted = repositories
        .connection_repository
        .set_status(&request.id, ConnectionStatus::Accepted)
        .await
        .expect("accept");
    assert_eq!(accepted.status, ConnectionStatus::Accepted);
    assert!(
        repositories
            .connection_repository
            .set_status(&request.id, ConnectionStatus::Rejected)
            .await
            .is_err(),
        "only pending requests change status"
    );
    assert_eq!(
        repositories
            .connection_repository
            .list_connection_ids(&bob.id)
            .await
            .expect("connection ids"),
        vec![alice.id]
    );

    // Follows
    assert!(repositories.follow_repository.follow(&alice.id, &bob.id).await.expect("follow"));
    assert_eq!(
        repositories
            .follow_repository
            .list_follower_ids(&bob.id)
            .await
            .expect("followers"),
        vec![alice.id]
    );

    // Messages
    repositories
        .message_repository
        .insert(SendMessageInput {
            sender_id: alice.id,
            receiver_id: bob.id,
            text: "hi".to_string(),
        })
        .await
        .expect("send message");
    assert_eq!(
        repositories.message_repository.count_unread(&bob.id).await.expect("unread"),
        1
    );
    assert_eq!(
        repositories
            .message_repository
            .mark_as_read(&bob.id, &alice.id)
            .await
            .expect("mark read"),
        1
    );
    assert!(repositories.blocked_user_repository.block(&bob.id, &alice.id).await.expect("block"));
    assert!(
        repositories
            .blocked_user_repository
            .is_blocked(&bob.id, &alice.id)
            .await
            .expect("is blocked")
    );

    // Notifications
    let mut preferences = NotificationPreference::default_for(bob.id);
    preferences.likes = false;
    repositories
        .notification_repository
        .upsert_preferences(preferences.clone())
        .await
        .expect("upsert preferences");
    assert_eq!(
        repositories
            .notification_repository
            .find_preferences(&bob.id)
            .await
            .expect("find preferences"),
        Some(preferences)
    );

    let notification = repositories
        .notification_repository
        .insert(NewNotification::from_actor(
            bob.id,
            NotificationType::NewFollower,
            alice.id,
            "You have a new follower",
        ))
        .await
        .expect("insert notification");
    assert!(
        !repositories
            .notification_repository
            .mark_as_read(&notification.id, &alice.id)
            .await
            .expect("mark as read by someone else")
    );
    assert_eq!(
        repositories
            .notification_repository
            .mark_all_as_read(&bob.id)
            .await
            .expect("mark all"),
        1
    );

    repositories.shutdown_pool().await;
}
