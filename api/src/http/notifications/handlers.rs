use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use revconnect_core::domain::{
    common::GetPaginated,
    notification::{
        entities::{Notification, NotificationId, NotificationPreference, UpdatePreferencesRequest},
        ports::NotificationService,
    },
};
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response,
    middleware::auth::entities::UserIdentity,
    response::{ChangedResponse, CountResponse, PaginatedResponse},
};

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(
        GetPaginated
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = PaginatedResponse<Notification>),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Notification>>, ApiError> {
    let (notifications, total) = state
        .service
        .get_notifications(&user_identity.id(), &pagination)
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: notifications,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    tag = "notifications",
    responses(
        (status = 200, description = "Number of unread notifications", body = CountResponse),
    )
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<CountResponse>, ApiError> {
    let count = state.service.get_unread_count(&user_identity.id()).await?;
    Ok(Response::ok(CountResponse { count }))
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notifications",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "`changed` is false when the notification is not the caller's", body = ChangedResponse),
    )
)]
pub async fn mark_as_read(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .mark_as_read(&NotificationId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "notifications",
    responses(
        (status = 200, description = "Number of notifications marked as read", body = CountResponse),
    )
)]
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<CountResponse>, ApiError> {
    let count = state.service.mark_all_as_read(&user_identity.id()).await?;
    Ok(Response::ok(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/notifications/preferences",
    tag = "notifications",
    responses(
        (status = 200, description = "Per-kind switches, all on until changed", body = NotificationPreference),
    )
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<NotificationPreference>, ApiError> {
    let preferences = state.service.get_preferences(&user_identity.id()).await?;
    Ok(Response::ok(preferences))
}

#[utoipa::path(
    put,
    path = "/notifications/preferences",
    tag = "notifications",
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Preferences stored", body = NotificationPreference),
    )
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Response<NotificationPreference>, ApiError> {
    let preferences = state
        .service
        .update_preferences(request.into_preference(user_identity.id()))
        .await?;
    Ok(Response::ok(preferences))
}
