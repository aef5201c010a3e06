use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use revconnect_core::domain::{
    common::GetPaginated,
    message::{
        entities::{BlockUserRequest, Message, SendMessageRequest},
        ports::MessageService,
    },
    user::entities::{UserId, UserSummary},
};
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response,
    error::ErrorBody,
    middleware::auth::entities::UserIdentity,
    response::{ChangedResponse, CountResponse, PaginatedResponse},
};

#[utoipa::path(
    post,
    path = "/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Self-message, unknown receiver, blocked, or invalid text", body = ErrorBody),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Response<Message>, ApiError> {
    let message = state
        .service
        .send_message(request.into_input(user_identity.id()))
        .await?;
    Ok(Response::created(message))
}

#[utoipa::path(
    get,
    path = "/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Number of unread messages received", body = CountResponse),
    )
)]
pub async fn get_unread_message_count(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<CountResponse>, ApiError> {
    let count = state
        .service
        .get_unread_message_count(&user_identity.id())
        .await?;
    Ok(Response::ok(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/conversations/{user_id}",
    tag = "messages",
    params(
        ("user_id" = String, Path, description = "The other participant"),
        GetPaginated
    ),
    responses(
        (status = 200, description = "Messages in both directions, oldest first", body = PaginatedResponse<Message>),
    )
)]
pub async fn get_conversation(
    Path(other_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Message>>, ApiError> {
    let (messages, total) = state
        .service
        .get_conversation(&user_identity.id(), &UserId::from(other_id), &pagination)
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: messages,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    post,
    path = "/conversations/{user_id}/read",
    tag = "messages",
    params(
        ("user_id" = String, Path, description = "The other participant")
    ),
    responses(
        (status = 200, description = "Number of messages marked as read", body = CountResponse),
    )
)]
pub async fn mark_conversation_as_read(
    Path(other_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<CountResponse>, ApiError> {
    let count = state
        .service
        .mark_conversation_as_read(&user_identity.id(), &UserId::from(other_id))
        .await?;
    Ok(Response::ok(CountResponse { count }))
}

#[utoipa::path(
    delete,
    path = "/conversations/{user_id}",
    tag = "messages",
    params(
        ("user_id" = String, Path, description = "The other participant")
    ),
    responses(
        (status = 200, description = "Number of messages deleted", body = CountResponse),
    )
)]
#[tracing::instrument(skip(state, user_identity))]
pub async fn delete_conversation(
    Path(other_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<CountResponse>, ApiError> {
    let count = state
        .service
        .delete_conversation(&user_identity.id(), &UserId::from(other_id))
        .await?;
    Ok(Response::deleted(CountResponse { count }))
}

// == Blocks ==

#[utoipa::path(
    post,
    path = "/blocks",
    tag = "blocks",
    request_body = BlockUserRequest,
    responses(
        (status = 200, description = "`changed` is false when already blocked", body = ChangedResponse),
        (status = 400, description = "Cannot block yourself", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn block_user(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<BlockUserRequest>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .block_user(&user_identity.id(), &request.user_id)
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    delete,
    path = "/blocks/{user_id}",
    tag = "blocks",
    params(
        ("user_id" = String, Path, description = "Blocked user")
    ),
    responses(
        (status = 200, description = "`changed` is false when the user was not blocked", body = ChangedResponse),
    )
)]
pub async fn unblock_user(
    Path(blocked_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .unblock_user(&user_identity.id(), &UserId::from(blocked_id))
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    get,
    path = "/blocks",
    tag = "blocks",
    responses(
        (status = 200, description = "Users blocked by the caller", body = Vec<UserSummary>),
    )
)]
pub async fn get_blocked_users(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<UserSummary>>, ApiError> {
    let users = state.service.get_blocked_users(&user_identity.id()).await?;
    Ok(Response::ok(users))
}
