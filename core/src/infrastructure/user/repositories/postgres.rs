use sqlx::{PgPool, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        common::{CoreError, GetPaginated, TotalPaginatedElements},
        user::{
            entities::{
                InsertUserInput, Profile, QuestionId, SecurityAnswer, SecurityQuestion,
                UpdateProfileInput, User, UserId, UserSummary,
            },
            ports::{SecurityQuestionRepository, UserRepository},
        },
    },
    infrastructure::database_error,
};

const USER_COLUMNS: &str =
    "id, email, username, password_hash, user_type, is_private, created_at, updated_at";

const PROFILE_COLUMNS: &str =
    "user_id, name, bio, location, website, profile_picture_url, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `_` is a wildcard for LIKE; everything else that could be one is removed by sanitizing.
fn like_pattern(keyword: &str) -> String {
    format!("%{}%", keyword.replace('\\', "\\\\").replace('_', "\\_"))
}

impl UserRepository for PostgresUserRepository {
    async fn insert(&self, input: InsertUserInput) -> Result<User, CoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let user = query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, user_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.user_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, name, bio, location, website, profile_picture_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.0)
        .bind(&input.profile.name)
        .bind(&input.profile.bio)
        .bind(&input.profile.location)
        .bind(&input.profile.website)
        .bind(&input.profile.profile_picture_url)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CoreError> {
        query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn find_summaries(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        query_as::<_, UserSummary>(
            r#"
            SELECT id, username, user_type, is_private
            FROM users
            WHERE id = ANY($1)
            ORDER BY username
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn search(
        &self,
        keyword: &str,
        pagination: &GetPaginated,
    ) -> Result<(Vec<UserSummary>, TotalPaginatedElements), CoreError> {
        let pattern = like_pattern(keyword);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        let users = query_as::<_, UserSummary>(
            r#"
            SELECT id, username, user_type, is_private
            FROM users
            WHERE username ILIKE $1
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok((users, total as TotalPaginatedElements))
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), CoreError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.0)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::validation("User not found"));
        }

        Ok(())
    }

    async fn update_privacy(&self, id: &UserId, is_private: bool) -> Result<User, CoreError> {
        query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_private = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(is_private)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| CoreError::validation("User not found"))
    }

    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, CoreError> {
        query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn update_profile(&self, input: UpdateProfileInput) -> Result<Profile, CoreError> {
        query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                website = COALESCE($5, website),
                profile_picture_url = COALESCE($6, profile_picture_url),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(input.user_id.0)
        .bind(input.name)
        .bind(input.bio)
        .bind(input.location)
        .bind(input.website)
        .bind(input.profile_picture_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .ok_or_else(|| CoreError::validation("Profile not found"))
    }
}

#[derive(Clone)]
pub struct PostgresSecurityQuestionRepository {
    pool: PgPool,
}

impl PostgresSecurityQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SecurityQuestionRepository for PostgresSecurityQuestionRepository {
    async fn list_questions(&self) -> Result<Vec<SecurityQuestion>, CoreError> {
        query_as::<_, SecurityQuestion>("SELECT id, question FROM security_questions ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<SecurityQuestion>, CoreError> {
        query_as::<_, SecurityQuestion>("SELECT id, question FROM security_questions WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn find_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<Option<SecurityAnswer>, CoreError> {
        query_as::<_, SecurityAnswer>(
            r#"
            SELECT user_id, question_id, answer_hash
            FROM security_answers
            WHERE user_id = $1 AND question_id = $2
            "#,
        )
        .bind(user_id.0)
        .bind(question_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn upsert_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        answer_hash: &str,
    ) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO security_answers (user_id, question_id, answer_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, question_id) DO UPDATE SET answer_hash = EXCLUDED.answer_hash
            "#,
        )
        .bind(user_id.0)
        .bind(question_id.0)
        .bind(answer_hash)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }
}
