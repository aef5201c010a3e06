use tracing::{info, warn};

use crate::domain::{
    common::{
        CoreError, GetPaginated, TotalPaginatedElements,
        password::{hash_password, normalize_security_answer, verify_password},
        services::{Repositories, Service},
        validation::{is_blank, is_valid_email, is_valid_password, is_valid_username, sanitize_input},
    },
    user::{
        entities::{
            InsertUserInput, Profile, QuestionId, RegisterUserInput, ResetPasswordInput,
            SecurityQuestion, UpdateProfileInput, User, UserId, UserSummary,
        },
        ports::{SecurityQuestionRepository, UserRepository, UserService},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email/username or password";
const WEAK_NEW_PASSWORD: &str =
    "New password must be at least 8 characters with 1 uppercase and 1 number";

impl<R> Service<R>
where
    R: Repositories,
{
    pub(crate) async fn ensure_user_exists(&self, user_id: &UserId) -> Result<(), CoreError> {
        match self.repositories.users().find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::validation("User not found")),
        }
    }
}

impl<R> UserService for Service<R>
where
    R: Repositories,
{
    async fn register(&self, input: RegisterUserInput) -> Result<User, CoreError> {
        if !is_valid_email(&input.email) {
            return Err(CoreError::validation("Invalid email format"));
        }

        if !is_valid_username(&input.username) {
            return Err(CoreError::validation("Invalid username."));
        }

        if !is_valid_password(&input.password) {
            return Err(CoreError::validation("Invalid password."));
        }

        if is_blank(&input.profile.name) {
            return Err(CoreError::validation("Name cannot be empty"));
        }

        let users = self.repositories.users();

        if users.find_by_email(&input.email).await?.is_some() {
            return Err(CoreError::validation("Email already registered"));
        }

        if users.find_by_username(&input.username).await?.is_some() {
            return Err(CoreError::validation("Username already taken"));
        }

        let password_hash = hash_password(&input.password)?;

        // User and profile go in together; a failure leaves nothing behind.
        let user = users
            .insert(InsertUserInput {
                email: input.email,
                username: input.username,
                password_hash,
                user_type: input.user_type,
                profile: input.profile,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "registered new user");

        Ok(user)
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<User, CoreError> {
        if is_blank(identifier) {
            return Err(CoreError::authentication("Email/Username cannot be empty"));
        }

        if is_blank(password) {
            return Err(CoreError::authentication("Password cannot be empty"));
        }

        let identifier = identifier.trim();
        let users = self.repositories.users();
        let user = if identifier.contains('@') {
            users.find_by_email(identifier).await?
        } else {
            users.find_by_username(identifier).await?
        };

        let Some(user) = user else {
            warn!("login failed: unknown account");
            return Err(CoreError::authentication(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(CoreError::authentication(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), CoreError> {
        let users = self.repositories.users();

        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::authentication("User not found"))?;

        if !verify_password(current_password, &user.password_hash)? {
            warn!(user_id = %user.id, "password change rejected: current password mismatch");
            return Err(CoreError::authentication("Current password is incorrect"));
        }

        if !is_valid_password(new_password) {
            return Err(CoreError::validation(WEAK_NEW_PASSWORD));
        }

        if current_password == new_password {
            return Err(CoreError::validation(
                "New password must be different from current password",
            ));
        }

        let password_hash = hash_password(new_password)?;
        users.update_password(user_id, &password_hash).await
    }

    async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), CoreError> {
        let users = self.repositories.users();

        let user = users
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| CoreError::authentication("Email not found"))?;

        let saved_answer = self
            .repositories
            .security_questions()
            .find_answer(&user.id, input.question_id)
            .await?
            .ok_or_else(|| {
                CoreError::authentication("Security question not answered for this account")
            })?;

        let answer = normalize_security_answer(&input.answer);
        if !verify_password(&answer, &saved_answer.answer_hash)? {
            warn!(user_id = %user.id, "password reset rejected: wrong security answer");
            return Err(CoreError::authentication("Security answer is incorrect"));
        }

        if !is_valid_password(&input.new_password) {
            return Err(CoreError::validation(WEAK_NEW_PASSWORD));
        }

        let password_hash = hash_password(&input.new_password)?;
        users.update_password(&user.id, &password_hash).await?;

        info!(user_id = %user.id, "password reset via security question");

        Ok(())
    }

    async fn list_security_questions(&self) -> Result<Vec<SecurityQuestion>, CoreError> {
        self.repositories.security_questions().list_questions().await
    }

    async fn set_security_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        answer: &str,
    ) -> Result<(), CoreError> {
        if is_blank(answer) {
            return Err(CoreError::validation("Security answer cannot be empty"));
        }

        let questions = self.repositories.security_questions();

        if questions.find_question(question_id).await?.is_none() {
            return Err(CoreError::validation("Security question not found"));
        }

        let answer_hash = hash_password(&normalize_security_answer(answer))?;
        questions
            .upsert_answer(user_id, question_id, &answer_hash)
            .await
    }

    async fn search_users(
        &self,
        keyword: &str,
        pagination: &GetPaginated,
    ) -> Result<(Vec<UserSummary>, TotalPaginatedElements), CoreError> {
        if is_blank(keyword) {
            return Err(CoreError::validation("Search keyword cannot be empty"));
        }

        let sanitized = sanitize_input(keyword);
        if sanitized.is_empty() {
            return Ok((Vec::new(), 0));
        }

        self.repositories
            .users()
            .search(&sanitized, pagination)
            .await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, CoreError> {
        self.repositories
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::validation("User not found"))
    }

    async fn view_profile(&self, user_id: &UserId) -> Result<Profile, CoreError> {
        self.repositories
            .users()
            .find_profile(user_id)
            .await?
            .ok_or_else(|| CoreError::validation("Profile not found"))
    }

    async fn update_profile(&self, input: UpdateProfileInput) -> Result<Profile, CoreError> {
        if let Some(ref name) = input.name {
            if is_blank(name) {
                return Err(CoreError::validation("Name cannot be empty"));
            }
        }

        let users = self.repositories.users();

        if users.find_profile(&input.user_id).await?.is_none() {
            return Err(CoreError::validation("Profile not found"));
        }

        users.update_profile(input).await
    }

    async fn update_privacy(&self, user_id: &UserId, is_private: bool) -> Result<User, CoreError> {
        self.ensure_user_exists(user_id).await?;
        self.repositories
            .users()
            .update_privacy(user_id, is_private)
            .await
    }
}
