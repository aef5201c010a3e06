use axum::{
    Extension, Json,
    extract::{Path, State},
};
use revconnect_core::domain::{
    network::{
        entities::{ConnectionRequest, ConnectionRequestId, SendConnectionRequest},
        ports::NetworkService,
    },
    user::entities::{UserId, UserSummary},
};
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response, error::ErrorBody, middleware::auth::entities::UserIdentity,
    response::ChangedResponse,
};

// == Connection requests ==

#[utoipa::path(
    post,
    path = "/connection-requests",
    tag = "connections",
    request_body = SendConnectionRequest,
    responses(
        (status = 201, description = "Request sent", body = ConnectionRequest),
        (status = 400, description = "Self-request, unknown user, already connected or already pending", body = ErrorBody),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn send_connection_request(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<SendConnectionRequest>,
) -> Result<Response<ConnectionRequest>, ApiError> {
    let connection_request = state
        .service
        .send_connection_request(&user_identity.id(), &request.receiver_id)
        .await?;
    Ok(Response::created(connection_request))
}

#[utoipa::path(
    get,
    path = "/connection-requests",
    tag = "connections",
    responses(
        (status = 200, description = "Pending requests sent to the caller, newest first", body = Vec<ConnectionRequest>),
    )
)]
pub async fn get_pending_requests(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<ConnectionRequest>>, ApiError> {
    let requests = state
        .service
        .get_pending_requests(&user_identity.id())
        .await?;
    Ok(Response::ok(requests))
}

#[utoipa::path(
    post,
    path = "/connection-requests/{id}/accept",
    tag = "connections",
    params(
        ("id" = String, Path, description = "Connection request ID")
    ),
    responses(
        (status = 200, description = "Request accepted", body = ConnectionRequest),
        (status = 400, description = "Unknown, not addressed to the caller, or no longer pending", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity))]
pub async fn accept_connection_request(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ConnectionRequest>, ApiError> {
    let request = state
        .service
        .accept_connection_request(&ConnectionRequestId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(request))
}

#[utoipa::path(
    post,
    path = "/connection-requests/{id}/reject",
    tag = "connections",
    params(
        ("id" = String, Path, description = "Connection request ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = ConnectionRequest),
        (status = 400, description = "Unknown, not addressed to the caller, or no longer pending", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity))]
pub async fn reject_connection_request(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ConnectionRequest>, ApiError> {
    let request = state
        .service
        .reject_connection_request(&ConnectionRequestId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(request))
}

// == Connections ==

#[utoipa::path(
    get,
    path = "/connections",
    tag = "connections",
    responses(
        (status = 200, description = "Users connected with the caller", body = Vec<UserSummary>),
    )
)]
pub async fn get_connections(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<UserSummary>>, ApiError> {
    let connections = state.service.get_connections(&user_identity.id()).await?;
    Ok(Response::ok(connections))
}

#[utoipa::path(
    delete,
    path = "/connections/{user_id}",
    tag = "connections",
    params(
        ("user_id" = String, Path, description = "Connected user")
    ),
    responses(
        (status = 200, description = "Connection removed"),
        (status = 400, description = "Not connected with this user", body = ErrorBody),
    )
)]
pub async fn remove_connection(
    Path(other_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .remove_connection(&user_identity.id(), &UserId::from(other_id))
        .await?;
    Ok(Response::deleted(()))
}

// == Follows ==

#[utoipa::path(
    post,
    path = "/follows/{user_id}",
    tag = "follows",
    params(
        ("user_id" = String, Path, description = "User to follow")
    ),
    responses(
        (status = 200, description = "`changed` is false when already following", body = ChangedResponse),
        (status = 400, description = "Self-follow or unknown user", body = ErrorBody),
    )
)]
pub async fn follow_user(
    Path(following_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .follow_user(&user_identity.id(), &UserId::from(following_id))
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    delete,
    path = "/follows/{user_id}",
    tag = "follows",
    params(
        ("user_id" = String, Path, description = "User to unfollow")
    ),
    responses(
        (status = 200, description = "`changed` is false when not following", body = ChangedResponse),
    )
)]
pub async fn unfollow_user(
    Path(following_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .unfollow_user(&user_identity.id(), &UserId::from(following_id))
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    get,
    path = "/users/me/followers",
    tag = "follows",
    responses(
        (status = 200, description = "Users following the caller", body = Vec<UserSummary>),
    )
)]
pub async fn get_followers(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<UserSummary>>, ApiError> {
    let followers = state.service.get_followers(&user_identity.id()).await?;
    Ok(Response::ok(followers))
}

#[utoipa::path(
    get,
    path = "/users/me/following",
    tag = "follows",
    responses(
        (status = 200, description = "Users the caller follows", body = Vec<UserSummary>),
    )
)]
pub async fn get_following(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<UserSummary>>, ApiError> {
    let following = state.service.get_following(&user_identity.id()).await?;
    Ok(Response::ok(following))
}
