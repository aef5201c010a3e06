use chrono::{DateTime, Utc};
use sqlx::{PgPool, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        common::{CoreError, GetPaginated, TotalPaginatedElements},
        post::{
            entities::{
                Comment, CommentId, InsertPostInput, Post, PostId, PostType, Share,
                UpdatePostRecord,
            },
            ports::{CommentRepository, LikeRepository, PostRepository, ShareRepository},
        },
        user::entities::UserId,
    },
    infrastructure::database_error,
};

const POST_COLUMNS: &str = "id, user_id, content, post_type, hashtags, is_pinned, scheduled_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostRepository for PostgresPostRepository {
    async fn insert(&self, input: InsertPostInput) -> Result<Post, CoreError> {
        query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, user_id, content, post_type, hashtags, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.user_id.0)
        .bind(&input.content)
        .bind(input.post_type)
        .bind(&input.hashtags)
        .bind(input.scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, CoreError> {
        query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn update(&self, id: &PostId, record: UpdatePostRecord) -> Result<Post, CoreError> {
        query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET
                content = $2,
                hashtags = $3,
                post_type = COALESCE($4, post_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&record.content)
        .bind(&record.hashtags)
        .bind(record.post_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| CoreError::validation("Post not found"))
    }

    async fn delete(&self, id: &PostId) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::validation("Post not found"));
        }

        Ok(())
    }

    async fn list_by_author(
        &self,
        author_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(author_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        let posts = query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE user_id = $1
            ORDER BY is_pinned DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author_id.0)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((posts, total as TotalPaginatedElements))
    }

    async fn list_feed(
        &self,
        author_ids: &[UserId],
        post_type: Option<PostType>,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let author_ids: Vec<Uuid> = author_ids.iter().map(|id| id.0).collect();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE user_id = ANY($1)
              AND ($2::post_type IS NULL OR post_type = $2)
              AND (scheduled_at IS NULL OR scheduled_at <= $3)
            "#,
        )
        .bind(&author_ids)
        .bind(post_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        let posts = query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE user_id = ANY($1)
              AND ($2::post_type IS NULL OR post_type = $2)
              AND (scheduled_at IS NULL OR scheduled_at <= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(&author_ids)
        .bind(post_type)
        .bind(now)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((posts, total as TotalPaginatedElements))
    }

    async fn list_trending(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Post>, CoreError> {
        query_as::<_, Post>(&format!(
            r#"
            WITH recent AS (
                SELECT {POST_COLUMNS}
                FROM posts
                WHERE created_at >= $1 AND (scheduled_at IS NULL OR scheduled_at <= $2)
            )
            SELECT {POST_COLUMNS}
            FROM recent
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS n FROM likes
                WHERE post_id IN (SELECT id FROM recent) GROUP BY post_id
            ) l ON l.post_id = recent.id
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS n FROM comments
                WHERE post_id IN (SELECT id FROM recent) GROUP BY post_id
            ) c ON c.post_id = recent.id
            LEFT JOIN (
                SELECT post_id, COUNT(*) AS n FROM shares
                WHERE post_id IN (SELECT id FROM recent) GROUP BY post_id
            ) s ON s.post_id = recent.id
            ORDER BY COALESCE(l.n, 0) + COALESCE(c.n, 0) + COALESCE(s.n, 0) DESC,
                     recent.created_at DESC
            LIMIT $3
            "#
        ))
        .bind(since)
        .bind(now)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn search_by_hashtag(
        &self,
        tag: &str,
        now: DateTime<Utc>,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Post>, TotalPaginatedElements), CoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM posts
            WHERE $1 = ANY(hashtags) AND (scheduled_at IS NULL OR scheduled_at <= $2)
            "#,
        )
        .bind(tag)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        let posts = query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE $1 = ANY(hashtags) AND (scheduled_at IS NULL OR scheduled_at <= $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(tag)
        .bind(now)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((posts, total as TotalPaginatedElements))
    }

    async fn pin(&self, id: &PostId, author_id: &UserId) -> Result<Post, CoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            "UPDATE posts SET is_pinned = FALSE WHERE user_id = $1 AND is_pinned AND id <> $2",
        )
        .bind(author_id.0)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        let post = query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET is_pinned = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(author_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?
        .ok_or_else(|| CoreError::validation("Post not found"))?;

        tx.commit().await.map_err(database_error)?;

        Ok(post)
    }
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CommentRepository for PostgresCommentRepository {
    async fn insert(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        text: &str,
    ) -> Result<Comment, CoreError> {
        query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, user_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, user_id, text, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id.0)
        .bind(user_id.0)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CoreError> {
        query_as::<_, Comment>(
            "SELECT id, post_id, user_id, text, created_at FROM comments WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn list_by_post(
        &self,
        post_id: &PostId,
        pagination: &GetPaginated,
    ) -> Result<(Vec<Comment>, TotalPaginatedElements), CoreError> {
        let total = self.count_by_post(post_id).await?;

        let comments = query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, text, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id.0)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((comments, total))
    }

    async fn delete(&self, id: &CommentId) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::validation("Comment not found"));
        }

        Ok(())
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(count as u64)
    }
}

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LikeRepository for PostgresLikeRepository {
    async fn add(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let result = sqlx::query(
            "INSERT INTO likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id.0)
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id.0)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(count as u64)
    }
}

#[derive(Clone)]
pub struct PostgresShareRepository {
    pool: PgPool,
}

impl PostgresShareRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ShareRepository for PostgresShareRepository {
    async fn add(&self, post_id: &PostId, user_id: &UserId) -> Result<Share, CoreError> {
        query_as::<_, Share>(
            r#"
            INSERT INTO shares (id, post_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id.0)
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn count_by_post(&self, post_id: &PostId) -> Result<u64, CoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shares WHERE post_id = $1")
            .bind(post_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(count as u64)
    }
}
