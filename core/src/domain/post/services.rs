use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::domain::{
    common::{
        CoreError, GetPaginated, TotalPaginatedElements,
        services::{Repositories, Service},
        validation::{extract_hashtags, is_blank, normalize_hashtag, validate_text},
    },
    network::ports::{ConnectionRepository, FollowRepository},
    notification::{
        entities::{NewNotification, NotificationType},
        ports::NotificationService,
    },
    post::{
        entities::{
            Comment, CommentId, CreatePostInput, FeedFilter, InsertPostInput, Post,
            PostAnalytics, PostId, Share, UpdatePostInput, UpdatePostRecord,
        },
        ports::{CommentRepository, LikeRepository, PostRepository, PostService, ShareRepository},
    },
    user::{entities::UserId, ports::UserRepository},
};

const TRENDING_WINDOW_DAYS: i64 = 7;
const TRENDING_DEFAULT_LIMIT: u32 = 10;
const TRENDING_MAX_LIMIT: u32 = 50;

impl<R> Service<R>
where
    R: Repositories,
{
    async fn find_post(&self, post_id: &PostId) -> Result<Post, CoreError> {
        self.repositories
            .posts()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| CoreError::validation("Post not found"))
    }

    async fn owned_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        denied: &'static str,
    ) -> Result<Post, CoreError> {
        let post = self.find_post(post_id).await?;
        if &post.user_id != user_id {
            return Err(CoreError::validation(denied));
        }
        Ok(post)
    }

    async fn analytics_for(&self, post_id: PostId) -> Result<PostAnalytics, CoreError> {
        let (likes, comments, shares) = futures::try_join!(
            self.repositories.likes().count_by_post(&post_id),
            self.repositories.comments().count_by_post(&post_id),
            self.repositories.shares().count_by_post(&post_id),
        )?;

        Ok(PostAnalytics {
            post_id,
            likes,
            comments,
            shares,
        })
    }

    /// Notifies the post's author about something `actor` did, unless the actor is the author.
    async fn notify_author(
        &self,
        post: &Post,
        actor: &UserId,
        kind: NotificationType,
        message: &str,
    ) -> Result<(), CoreError> {
        if &post.user_id == actor {
            return Ok(());
        }

        self.create_notification(
            NewNotification::from_actor(post.user_id, kind, *actor, message).on_post(post.id),
        )
        .await?;
        Ok(())
    }

    /// The user, everyone they follow, and everyone they are connected with.
    async fn feed_authors(&self, user_id: &UserId) -> Result<Vec<UserId>, CoreError> {
        let (following, connections) = futures::try_join!(
            self.repositories.follows().list_following_ids(user_id),
            self.repositories.connections().list_connection_ids(user_id),
        )?;

        let mut authors = vec![*user_id];
        for id in following.into_iter().chain(connections) {
            if !authors.contains(&id) {
                authors.push(id);
            }
        }
        Ok(authors)
    }

    async fn store_post(&self, input: CreatePostInput) -> Result<Post, CoreError> {
        let hashtags = extract_hashtags(&input.content);
        self.repositories
            .posts()
            .insert(InsertPostInput {
                user_id: input.user_id,
                content: input.content,
                post_type: input.post_type,
                hashtags,
                scheduled_at: input.scheduled_at,
            })
            .await
    }
}

impl<R> PostService for Service<R>
where
    R: Repositories,
{
    async fn create_post(&self, input: CreatePostInput) -> Result<Post, CoreError> {
        validate_text("Post content", &input.content, self.limits.max_post_length)?;

        let post = self
            .store_post(CreatePostInput {
                scheduled_at: None,
                ..input
            })
            .await?;

        let followers = self
            .repositories
            .follows()
            .list_follower_ids(&post.user_id)
            .await?;

        for follower in followers {
            self.create_notification(
                NewNotification::from_actor(
                    follower,
                    NotificationType::NewPost,
                    post.user_id,
                    "Someone you follow published a new post",
                )
                .on_post(post.id),
            )
            .await?;
        }

        debug!(post_id = %post.id, author = %post.user_id, "post created");

        Ok(post)
    }

    async fn update_post(&self, input: UpdatePostInput) -> Result<Post, CoreError> {
        let post = self
            .owned_post(&input.post_id, &input.user_id, "You can only edit your own posts")
            .await?;

        validate_text("Post content", &input.content, self.limits.max_post_length)?;

        let hashtags = extract_hashtags(&input.content);
        self.repositories
            .posts()
            .update(
                &post.id,
                UpdatePostRecord {
                    content: input.content,
                    hashtags,
                    post_type: input.post_type,
                },
            )
            .await
    }

    async fn delete_post(&self, post_id: &PostId, user_id: &UserId) -> Result<(), CoreError> {
        let post = self
            .owned_post(post_id, user_id, "You can only delete your own posts")
            .await?;

        self.repositories.posts().delete(&post.id).await
    }

    async fn get_post(&self, post_id: &PostId, viewer: &UserId) -> Result<Post, CoreError> {
        let post = self.find_post(post_id).await?;
        if &post.user_id != viewer && !post.is_published(Utc::now()) {
            return Err(CoreError::validation("Post not found"));
        }
        Ok(post)
    }

    async fn get_my_posts(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        self.repositories
            .posts()
            .list_by_author(user_id, pagination)
            .await
    }

    async fn get_feed(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        self.get_filtered_feed(user_id, &FeedFilter::default(), pagination)
            .await
    }

    async fn get_filtered_feed(
        &self,
        user_id: &UserId,
        filter: &FeedFilter,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let mut authors = self.feed_authors(user_id).await?;

        if let Some(user_type) = filter.user_type {
            authors = self
                .repositories
                .users()
                .find_summaries(&authors)
                .await?
                .into_iter()
                .filter(|summary| summary.user_type == user_type)
                .map(|summary| summary.id)
                .collect();
        }

        if authors.is_empty() {
            return Ok((Vec::new(), 0));
        }

        self.repositories
            .posts()
            .list_feed(&authors, filter.post_type, Utc::now(), pagination)
            .await
    }

    async fn get_trending_posts(&self, limit: Option<u32>) -> Result<Vec<Post>, CoreError> {
        let limit = limit
            .unwrap_or(TRENDING_DEFAULT_LIMIT)
            .clamp(1, TRENDING_MAX_LIMIT);

        let now = Utc::now();
        let since = now - Duration::days(TRENDING_WINDOW_DAYS);
        self.repositories
            .posts()
            .list_trending(since, now, limit)
            .await
    }

    async fn search_by_hashtag(
        &self,
        hashtag: &str,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let tag = normalize_hashtag(hashtag);
        if is_blank(&tag) {
            return Err(CoreError::validation("Hashtag cannot be empty"));
        }

        self.repositories
            .posts()
            .search_by_hashtag(&tag, Utc::now(), pagination)
            .await
    }

    async fn like_post(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let post = self.find_post(post_id).await?;

        let liked = self.repositories.likes().add(&post.id, user_id).await?;

        if liked {
            self.notify_author(&post, user_id, NotificationType::Like, "Someone liked your post")
                .await?;
        }

        Ok(liked)
    }

    async fn unlike_post(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let post = self.find_post(post_id).await?;
        self.repositories.likes().remove(&post.id, user_id).await
    }

    async fn comment_on_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        text: &str,
    ) -> Result<Comment, CoreError> {
        let post = self.find_post(post_id).await?;

        validate_text("Comment", text, self.limits.max_comment_length)?;

        let comment = self
            .repositories
            .comments()
            .insert(&post.id, user_id, text)
            .await?;

        self.notify_author(
            &post,
            user_id,
            NotificationType::Comment,
            "Someone commented on your post",
        )
        .await?;

        Ok(comment)
    }

    async fn get_comments(
        &self,
        post_id: &PostId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Comment>, TotalPaginatedElements), CoreError> {
        let post = self.find_post(post_id).await?;
        self.repositories
            .comments()
            .list_by_post(&post.id, pagination)
            .await
    }

    async fn delete_comment(&self, comment_id: &CommentId, user_id: &UserId) -> Result<(), CoreError> {
        let comments = self.repositories.comments();

        let comment = comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| CoreError::validation("Comment not found"))?;

        if &comment.user_id != user_id {
            let post_author = self
                .repositories
                .posts()
                .find_by_id(&comment.post_id)
                .await?
                .map(|post| post.user_id);

            if post_author.as_ref() != Some(user_id) {
                return Err(CoreError::validation(
                    "You can only delete your own comments",
                ));
            }
        }

        comments.delete(&comment.id).await
    }

    async fn share_post(&self, post_id: &PostId, user_id: &UserId) -> Result<Share, CoreError> {
        let post = self.find_post(post_id).await?;

        let share = self.repositories.shares().add(&post.id, user_id).await?;

        self.notify_author(&post, user_id, NotificationType::Share, "Someone shared your post")
            .await?;

        Ok(share)
    }

    async fn schedule_post(&self, input: CreatePostInput) -> Result<Post, CoreError> {
        let Some(scheduled_at) = input.scheduled_at else {
            return Err(CoreError::validation("Scheduled time cannot be null"));
        };

        if scheduled_at <= Utc::now() {
            return Err(CoreError::validation(
                "Scheduled time must be in the future",
            ));
        }

        validate_text("Post content", &input.content, self.limits.max_post_length)?;

        let post = self.store_post(input).await?;

        info!(post_id = %post.id, %scheduled_at, "post scheduled");

        Ok(post)
    }

    async fn pin_post(&self, post_id: &PostId, user_id: &UserId) -> Result<Post, CoreError> {
        let post = self
            .owned_post(post_id, user_id, "You can only pin your own posts")
            .await?;

        self.repositories.posts().pin(&post.id, &post.user_id).await
    }

    async fn get_analytics(&self, post_id: &PostId) -> Result<PostAnalytics, CoreError> {
        let post = self.find_post(post_id).await?;
        self.analytics_for(post.id).await
    }
}
