use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::{
    common::{CoreError, GetPaginated, TotalPaginatedElements, mock::lock},
    user::entities::{
        InsertUserInput, Profile, QuestionId, RegisterUserInput, ResetPasswordInput,
        SecurityAnswer, SecurityQuestion, UpdateProfileInput, User, UserId, UserSummary,
    },
};

pub trait UserRepository: Send + Sync {
    /// Inserts the user together with their profile. Both rows are written or neither is.
    fn insert(
        &self,
        input: InsertUserInput,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn find_by_id(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    /// Summaries for the given ids, ordered by username. Unknown ids are skipped.
    fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> impl Future<Output = Result<Vec<UserSummary>, CoreError>> + Send;

    /// Case-insensitive substring match on the username.
    fn search(
        &self,
        keyword: &str,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<UserSummary>, TotalPaginatedElements), CoreError>> + Send;

    fn update_password(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update_privacy(
        &self,
        id: &UserId,
        is_private: bool,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn find_profile(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Profile>, CoreError>> + Send;

    /// Overwrites only the fields that are `Some`.
    fn update_profile(
        &self,
        input: UpdateProfileInput,
    ) -> impl Future<Output = Result<Profile, CoreError>> + Send;
}

pub trait SecurityQuestionRepository: Send + Sync {
    fn list_questions(&self) -> impl Future<Output = Result<Vec<SecurityQuestion>, CoreError>> + Send;

    fn find_question(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<Option<SecurityQuestion>, CoreError>> + Send;

    fn find_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
    ) -> impl Future<Output = Result<Option<SecurityAnswer>, CoreError>> + Send;

    fn upsert_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        answer_hash: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Registration, authentication, and profile management.
///
/// Every method validates its input before anything is written. Business-rule
/// failures come back as [`CoreError::Validation`]; credential failures as
/// [`CoreError::Authentication`].
pub trait UserService: Send + Sync {
    /// Registers a user and their profile.
    ///
    /// Rejects malformed emails, usernames, and passwords, blank profile names,
    /// and emails or usernames that are already in use. The password is hashed
    /// before it reaches the repository.
    fn register(
        &self,
        input: RegisterUserInput,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    /// Looks the account up by email when `identifier` contains an `@`, by
    /// username otherwise, and checks the password against the stored hash.
    fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Sets a new password after checking the answer to one of the user's
    /// security questions.
    fn reset_password(
        &self,
        input: ResetPasswordInput,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_security_questions(
        &self,
    ) -> impl Future<Output = Result<Vec<SecurityQuestion>, CoreError>> + Send;

    fn set_security_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        answer: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn search_users(
        &self,
        keyword: &str,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<(Vec<UserSummary>, TotalPaginatedElements), CoreError>> + Send;

    fn get_user(&self, user_id: &UserId) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn view_profile(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Profile, CoreError>> + Send;

    fn update_profile(
        &self,
        input: UpdateProfileInput,
    ) -> impl Future<Output = Result<Profile, CoreError>> + Send;

    fn update_privacy(
        &self,
        user_id: &UserId,
        is_private: bool,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    profiles: Arc<Mutex<Vec<Profile>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MockUserRepository {
    async fn insert(&self, input: InsertUserInput) -> Result<User, CoreError> {
        let mut users = lock(&self.users)?;

        if users
            .iter()
            .any(|u| u.email == input.email || u.username == input.username)
        {
            return Err(CoreError::DatabaseError {
                msg: "duplicate key value violates unique constraint".to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: UserId::from(uuid::Uuid::new_v4()),
            email: input.email,
            username: input.username,
            password_hash: input.password_hash,
            user_type: input.user_type,
            is_private: false,
            created_at: now,
            updated_at: None,
        };
        let profile = Profile {
            user_id: user.id,
            name: input.profile.name,
            bio: input.profile.bio,
            location: input.profile.location,
            website: input.profile.website,
            profile_picture_url: input.profile.profile_picture_url,
            created_at: now,
            updated_at: None,
        };

        users.push(user.clone());
        lock(&self.profiles)?.push(profile);

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CoreError> {
        let users = lock(&self.users)?;
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let users = lock(&self.users)?;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let users = lock(&self.users)?;
        Ok(users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_summaries(&self, ids: &[UserId]) -> Result<Vec<UserSummary>, CoreError> {
        let users = lock(&self.users)?;
        let mut summaries: Vec<UserSummary> = users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(User::summary)
            .collect();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(summaries)
    }

    async fn search(
        &self,
        keyword: &str,
        pagination: &GetPaginated,
    ) -> Result<(Vec<UserSummary>, TotalPaginatedElements), CoreError> {
        let users = lock(&self.users)?;
        let needle = keyword.to_lowercase();
        let mut matches: Vec<UserSummary> = users
            .iter()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .map(User::summary)
            .collect();
        matches.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(pagination.apply(matches))
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), CoreError> {
        let mut users = lock(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| CoreError::validation("User not found"))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn update_privacy(&self, id: &UserId, is_private: bool) -> Result<User, CoreError> {
        let mut users = lock(&self.users)?;
        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| CoreError::validation("User not found"))?;
        user.is_private = is_private;
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, CoreError> {
        let profiles = lock(&self.profiles)?;
        Ok(profiles.iter().find(|p| &p.user_id == user_id).cloned())
    }

    async fn update_profile(&self, input: UpdateProfileInput) -> Result<Profile, CoreError> {
        let mut profiles = lock(&self.profiles)?;
        let profile = profiles
            .iter_mut()
            .find(|p| p.user_id == input.user_id)
            .ok_or_else(|| CoreError::validation("Profile not found"))?;

        if let Some(name) = input.name {
            profile.name = name;
        }
        if let Some(bio) = input.bio {
            profile.bio = Some(bio);
        }
        if let Some(location) = input.location {
            profile.location = Some(location);
        }
        if let Some(website) = input.website {
            profile.website = Some(website);
        }
        if let Some(url) = input.profile_picture_url {
            profile.profile_picture_url = Some(url);
        }
        profile.updated_at = Some(Utc::now());

        Ok(profile.clone())
    }
}

#[derive(Clone)]
pub struct MockSecurityQuestionRepository {
    questions: Arc<Mutex<Vec<SecurityQuestion>>>,
    answers: Arc<Mutex<Vec<SecurityAnswer>>>,
}

impl MockSecurityQuestionRepository {
    /// Starts with the same three questions the migration seeds.
    pub fn new() -> Self {
        let questions = [
            "What was the name of your first pet?",
            "In which city were you born?",
            "What is your favourite book?",
        ]
        .into_iter()
        .enumerate()
        .map(|(index, question)| SecurityQuestion {
            id: QuestionId(index as i32 + 1),
            question: question.to_string(),
        })
        .collect();

        Self {
            questions: Arc::new(Mutex::new(questions)),
            answers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for MockSecurityQuestionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityQuestionRepository for MockSecurityQuestionRepository {
    async fn list_questions(&self) -> Result<Vec<SecurityQuestion>, CoreError> {
        Ok(lock(&self.questions)?.clone())
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<SecurityQuestion>, CoreError> {
        let questions = lock(&self.questions)?;
        Ok(questions.iter().find(|q| q.id == id).cloned())
    }

    async fn find_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
    ) -> Result<Option<SecurityAnswer>, CoreError> {
        let answers = lock(&self.answers)?;
        Ok(answers
            .iter()
            .find(|a| &a.user_id == user_id && a.question_id == question_id)
            .cloned())
    }

    async fn upsert_answer(
        &self,
        user_id: &UserId,
        question_id: QuestionId,
        answer_hash: &str,
    ) -> Result<(), CoreError> {
        let mut answers = lock(&self.answers)?;
        match answers
            .iter_mut()
            .find(|a| &a.user_id == user_id && a.question_id == question_id)
        {
            Some(answer) => answer.answer_hash = answer_hash.to_string(),
            None => answers.push(SecurityAnswer {
                user_id: *user_id,
                question_id,
                answer_hash: answer_hash.to_string(),
            }),
        }
        Ok(())
    }
}
