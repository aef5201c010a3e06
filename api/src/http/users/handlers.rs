use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use revconnect_core::domain::{
    common::GetPaginated,
    user::{
        entities::{
            ChangePasswordRequest, LoginInput, Profile, RegisterUserInput, ResetPasswordInput,
            SecurityQuestion, SetSecurityAnswerRequest, UpdatePrivacyRequest,
            UpdateProfileRequest, User, UserId, UserSummary,
        },
        ports::UserService,
    },
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response,
    error::ErrorBody,
    middleware::auth::entities::{AuthToken, UserIdentity},
    response::PaginatedResponse,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user: User,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Part of a username
    pub keyword: String,
}

// == Public ==

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUserInput,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid input or email/username taken", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, input), fields(username = %input.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserInput>,
) -> Result<Response<User>, ApiError> {
    let user = state.service.register(input).await?;
    Ok(Response::created(user))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Response<LoginResponse>, ApiError> {
    let user = state
        .service
        .login(&input.identifier, &input.password)
        .await?;

    let token = state.jwt.issue(&user.id).map_err(|e| {
        tracing::error!("failed to sign access token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Response::ok(LoginResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordInput,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Wrong answer or invalid password", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordInput>,
) -> Result<Response<()>, ApiError> {
    state.service.reset_password(input).await?;
    Ok(Response::ok(()))
}

#[utoipa::path(
    get,
    path = "/security-questions",
    tag = "auth",
    responses(
        (status = 200, description = "Available security questions", body = Vec<SecurityQuestion>),
    )
)]
pub async fn list_security_questions(
    State(state): State<AppState>,
) -> Result<Response<Vec<SecurityQuestion>>, ApiError> {
    let questions = state.service.list_security_questions().await?;
    Ok(Response::ok(questions))
}

// == Authenticated ==

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<User>, ApiError> {
    let user = state.service.get_user(&user_identity.id()).await?;
    Ok(Response::ok(user))
}

#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid new password", body = ErrorBody),
        (status = 401, description = "Current password is wrong", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .change_password(
            &user_identity.id(),
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(Response::ok(()))
}

#[utoipa::path(
    put,
    path = "/users/me/security-answer",
    tag = "users",
    request_body = SetSecurityAnswerRequest,
    responses(
        (status = 200, description = "Answer stored"),
        (status = 400, description = "Unknown question or blank answer", body = ErrorBody),
    )
)]
pub async fn set_security_answer(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<SetSecurityAnswerRequest>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .set_security_answer(&user_identity.id(), request.question_id, &request.answer)
        .await?;
    Ok(Response::ok(()))
}

#[utoipa::path(
    put,
    path = "/users/me/privacy",
    tag = "users",
    request_body = UpdatePrivacyRequest,
    responses(
        (status = 200, description = "Privacy updated", body = User),
    )
)]
pub async fn update_privacy(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<UpdatePrivacyRequest>,
) -> Result<Response<User>, ApiError> {
    let user = state
        .service
        .update_privacy(&user_identity.id(), request.is_private)
        .await?;
    Ok(Response::ok(user))
}

#[utoipa::path(
    put,
    path = "/users/me/profile",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Blank name", body = ErrorBody),
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Response<Profile>, ApiError> {
    let profile = state
        .service
        .update_profile(request.into_input(user_identity.id()))
        .await?;
    Ok(Response::ok(profile))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/profile",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 400, description = "Profile not found", body = ErrorBody),
    )
)]
pub async fn view_profile(
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<Profile>, ApiError> {
    let profile = state.service.view_profile(&UserId::from(user_id)).await?;
    Ok(Response::ok(profile))
}

#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    params(
        SearchQuery,
        GetPaginated
    ),
    responses(
        (status = 200, description = "Matching users", body = PaginatedResponse<UserSummary>),
        (status = 400, description = "Blank keyword", body = ErrorBody),
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<UserSummary>>, ApiError> {
    let (users, total) = state
        .service
        .search_users(&search.keyword, &pagination)
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: users,
        total,
        page: pagination.page,
    }))
}
