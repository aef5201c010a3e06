use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{
    common::{CoreError, GetPaginated, TotalPaginatedElements, mock::lock},
    post::entities::{
        Comment, CommentId, CreatePostInput, FeedFilter, InsertPostInput, Post, PostAnalytics,
        PostId, PostType, Share, ShareId, UpdatePostInput, UpdatePostRecord,
    },
    user::entities::UserId,
};

pub trait PostRepository: Send + Sync {
    fn insert(&self, input: InsertPostInput)
    -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn find_by_id(
        &self,
        id: &PostId,
    ) -> impl Future<Output = Result<Option<Post>, CoreError>> + Send;

    fn update(
        &self,
        id: &PostId,
        record: UpdatePostRecord,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn delete(&self, id: &PostId) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Every post by the author, scheduled ones included. Pinned first, then newest first.
    fn list_by_author(
        &self,
        author_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Posts by any of `author_ids` that are published at `now`, newest first.
    fn list_feed(
        &self,
        author_ids: &[UserId],
        post_type: Option<PostType>,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Posts published between `since` and `now`, ranked by likes + comments + shares.
    /// Ties go to the newer post. At most `limit` of them.
    fn list_trending(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Post>, CoreError>> + Send;

    /// `tag` is expected to be normalized already (lowercase, no `#`).
    fn search_by_hashtag(
        &self,
        tag: &str,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Pins the post and unpins every other post of the same author.
    fn pin(
        &self,
        id: &PostId,
        author_id: &UserId,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;
}

pub trait CommentRepository: Send + Sync {
    fn insert(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        text: &str,
    ) -> impl Future<Output = Result<Comment, CoreError>> + Send;

    fn find_by_id(
        &self,
        id: &CommentId,
    ) -> impl Future<Output = Result<Option<Comment>, CoreError>> + Send;

    /// Oldest first.
    fn list_by_post(
        &self,
        post_id: &PostId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Comment>, TotalPaginatedElements), CoreError>> + Send;

    fn delete(&self, id: &CommentId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn count_by_post(&self, post_id: &PostId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;
}

pub trait LikeRepository: Send + Sync {
    /// `true` when a new like was stored, `false` when the user had already liked the post.
    fn add(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// `true` when a like was removed.
    fn remove(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn count_by_post(&self, post_id: &PostId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;
}

pub trait ShareRepository: Send + Sync {
    fn add(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Share, CoreError>> + Send;

    fn count_by_post(&self, post_id: &PostId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;
}

/// Posts and everything hanging off them: comments, likes, shares, pins, and analytics.
///
/// Owner-only operations (edit, delete, pin) check the requester against the post's
/// author. Likes, comments and shares on someone else's post notify the author,
/// subject to the author's notification preferences.
pub trait PostService: Send + Sync {
    /// Publishes a post immediately and notifies the author's followers.
    fn create_post(
        &self,
        input: CreatePostInput,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn update_post(
        &self,
        input: UpdatePostInput,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn delete_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// A scheduled post is only visible to its author until it is published.
    fn get_post(
        &self,
        post_id: &PostId,
        viewer: &UserId,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn get_my_posts(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Published posts from the user, the people they follow, and their connections.
    fn get_feed(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Same as [`PostService::get_feed`], narrowed by post type and/or author type.
    fn get_filtered_feed(
        &self,
        user_id: &UserId,
        filter: &FeedFilter,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    /// Published posts of the last week, ordered by likes + comments + shares.
    fn get_trending_posts(
        &self,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Post>, CoreError>> + Send;

    fn search_by_hashtag(
        &self,
        hashtag: &str,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Post>, TotalPaginatedElements), CoreError>> + Send;

    fn like_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn unlike_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn comment_on_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        text: &str,
    ) -> impl Future<Output = Result<Comment, CoreError>> + Send;

    fn get_comments(
        &self,
        post_id: &PostId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<Comment>, TotalPaginatedElements), CoreError>> + Send;

    /// Allowed for the comment's author and for the author of the post it belongs to.
    fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn share_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Share, CoreError>> + Send;

    /// Stores a post that becomes visible at `input.scheduled_at`, which must be in the future.
    fn schedule_post(
        &self,
        input: CreatePostInput,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn pin_post(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Post, CoreError>> + Send;

    fn get_analytics(
        &self,
        post_id: &PostId,
    ) -> impl Future<Output = Result<PostAnalytics, CoreError>> + Send;
}

fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Holds handles on the comment, like and share stores so it can rank trending posts.
#[derive(Clone, Default)]
pub struct MockPostRepository {
    posts: Arc<Mutex<Vec<Post>>>,
    comments: MockCommentRepository,
    likes: MockLikeRepository,
    shares: MockShareRepository,
}

impl MockPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores trending posts against the given stores instead of private empty ones.
    pub fn with_engagement(
        comments: MockCommentRepository,
        likes: MockLikeRepository,
        shares: MockShareRepository,
    ) -> Self {
        Self {
            posts: Arc::default(),
            comments,
            likes,
            shares,
        }
    }

    fn engagement(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let likes = lock(&self.likes.likes)?;
        let comments = lock(&self.comments.comments)?;
        let shares = lock(&self.shares.shares)?;

        let count = likes.iter().filter(|(p, _)| p == post_id).count()
            + comments.iter().filter(|c| &c.post_id == post_id).count()
            + shares.iter().filter(|s| &s.post_id == post_id).count();
        Ok(count as u64)
    }
}

impl PostRepository for MockPostRepository {
    async fn insert(&self, input: InsertPostInput) -> Result<Post, CoreError> {
        let mut posts = lock(&self.posts)?;

        let post = Post {
            id: PostId::from(uuid::Uuid::new_v4()),
            user_id: input.user_id,
            content: input.content,
            post_type: input.post_type,
            hashtags: input.hashtags,
            is_pinned: false,
            scheduled_at: input.scheduled_at,
            created_at: Utc::now(),
            updated_at: None,
        };
        posts.push(post.clone());

        Ok(post)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, CoreError> {
        let posts = lock(&self.posts)?;
        Ok(posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn update(&self, id: &PostId, record: UpdatePostRecord) -> Result<Post, CoreError> {
        let mut posts = lock(&self.posts)?;
        let post = posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CoreError::validation("Post not found"))?;

        post.content = record.content;
        post.hashtags = record.hashtags;
        if let Some(post_type) = record.post_type {
            post.post_type = post_type;
        }
        post.updated_at = Some(Utc::now());

        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), CoreError> {
        let mut posts = lock(&self.posts)?;
        let index = posts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CoreError::validation("Post not found"))?;
        posts.remove(index);
        Ok(())
    }

    async fn list_by_author(
        &self,
        author_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let posts = lock(&self.posts)?;
        let mut mine: Vec<Post> = posts
            .iter()
            .filter(|p| &p.user_id == author_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.is_pinned.cmp(&a.is_pinned).then(newest_first(a, b)));
        Ok(pagination.apply(mine))
    }

    async fn list_feed(
        &self,
        author_ids: &[UserId],
        post_type: Option<PostType>,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let posts = lock(&self.posts)?;
        let mut feed: Vec<Post> = posts
            .iter()
            .filter(|p| author_ids.contains(&p.user_id))
            .filter(|p| post_type.is_none_or(|t| p.post_type == t))
            .filter(|p| p.is_published(now))
            .cloned()
            .collect();
        feed.sort_by(newest_first);
        Ok(pagination.apply(feed))
    }

    async fn list_trending(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Post>, CoreError> {
        let recent: Vec<Post> = lock(&self.posts)?
            .iter()
            .filter(|p| p.created_at >= since && p.is_published(now))
            .cloned()
            .collect();

        let mut scored = recent
            .into_iter()
            .map(|post| Ok((self.engagement(&post.id)?, post)))
            .collect::<Result<Vec<(u64, Post)>, CoreError>>()?;
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then(newest_first(a, b))
        });

        Ok(scored
            .into_iter()
            .take(limit as usize)
            .map(|(_, post)| post)
            .collect())
    }

    async fn search_by_hashtag(
        &self,
        tag: &str,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let posts = lock(&self.posts)?;
        let mut tagged: Vec<Post> = posts
            .iter()
            .filter(|p| p.hashtags.iter().any(|h| h == tag) && p.is_published(now))
            .cloned()
            .collect();
        tagged.sort_by(newest_first);
        Ok(pagination.apply(tagged))
    }

    async fn pin(&self, id: &PostId, author_id: &UserId) -> Result<Post, CoreError> {
        let mut posts = lock(&self.posts)?;

        if !posts.iter().any(|p| &p.id == id) {
            return Err(CoreError::validation("Post not found"));
        }

        let mut pinned = None;
        for post in posts.iter_mut().filter(|p| &p.user_id == author_id) {
            post.is_pinned = &post.id == id;
            if post.is_pinned {
                pinned = Some(post.clone());
            }
        }

        pinned.ok_or_else(|| CoreError::validation("You can only pin your own posts"))
    }
}

#[derive(Clone, Default)]
pub struct MockCommentRepository {
    comments: Arc<Mutex<Vec<Comment>>>,
}

impl MockCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for MockCommentRepository {
    async fn insert(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        text: &str,
    ) -> Result<Comment, CoreError> {
        let mut comments = lock(&self.comments)?;
        let comment = Comment {
            id: CommentId::from(uuid::Uuid::new_v4()),
            post_id: *post_id,
            user_id: *user_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CoreError> {
        let comments = lock(&self.comments)?;
        Ok(comments.iter().find(|c| &c.id == id).cloned())
    }

    async fn list_by_post(
        &self,
        post_id: &PostId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Comment>, TotalPaginatedElements), CoreError> {
        let comments = lock(&self.comments)?;
        let on_post: Vec<Comment> = comments
            .iter()
            .filter(|c| &c.post_id == post_id)
            .cloned()
            .collect();
        Ok(pagination.apply(on_post))
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CoreError> {
        let mut comments = lock(&self.comments)?;
        let count_before = comments.len();
        comments.retain(|c| &c.id != id);

        if comments.len() == count_before {
            return Err(CoreError::validation("Comment not found"));
        }

        Ok(())
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let comments = lock(&self.comments)?;
        Ok(comments.iter().filter(|c| &c.post_id == post_id).count() as u64)
    }
}

#[derive(Clone, Default)]
pub struct MockLikeRepository {
    likes: Arc<Mutex<Vec<(PostId, UserId)>>>,
}

impl MockLikeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeRepository for MockLikeRepository {
    async fn add(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let mut likes = lock(&self.likes)?;
        let like = (*post_id, *user_id);
        if likes.contains(&like) {
            return Ok(false);
        }
        likes.push(like);
        Ok(true)
    }

    async fn remove(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let mut likes = lock(&self.likes)?;
        let count_before = likes.len();
        likes.retain(|(p, u)| !(p == post_id && u == user_id));
        Ok(likes.len() != count_before)
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let likes = lock(&self.likes)?;
        Ok(likes.iter().filter(|(p, _)| p == post_id).count() as u64)
    }
}

#[derive(Clone, Default)]
pub struct MockShareRepository {
    shares: Arc<Mutex<Vec<Share>>>,
}

impl MockShareRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareRepository for MockShareRepository {
    async fn add(&self, post_id: &PostId, user_id: &UserId) -> Result<Share, CoreError> {
        let mut shares = lock(&self.shares)?;
        let share = Share {
            id: ShareId::from(uuid::Uuid::new_v4()),
            post_id: *post_id,
            user_id: *user_id,
            created_at: Utc::now(),
        };
        shares.push(share.clone());
        Ok(share)
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let shares = lock(&self.shares)?;
        Ok(shares.iter().filter(|s| &s.post_id == post_id).count() as u64)
    }
}
