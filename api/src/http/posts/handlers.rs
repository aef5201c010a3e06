use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use revconnect_core::domain::{
    common::GetPaginated,
    post::{
        entities::{
            Comment, CommentId, CreateCommentRequest, CreatePostRequest, FeedFilter, Post,
            PostAnalytics, PostId, Share, UpdatePostRequest,
        },
        ports::PostService,
    },
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response,
    error::ErrorBody,
    middleware::auth::entities::UserIdentity,
    response::{ChangedResponse, PaginatedResponse},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendingQuery {
    /// Defaults to 10, capped at 50
    pub limit: Option<u32>,
}

// == Posts ==

#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post published", body = Post),
        (status = 400, description = "Blank or too long content", body = ErrorBody),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response<Post>, ApiError> {
    let mut input = request.into_input(user_identity.id());
    // Scheduling goes through /scheduled-posts.
    input.scheduled_at = None;
    let post = state.service.create_post(input).await?;
    Ok(Response::created(post))
}

#[utoipa::path(
    post,
    path = "/scheduled-posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post scheduled", body = Post),
        (status = 400, description = "Missing or past schedule, or invalid content", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn schedule_post(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Response<Post>, ApiError> {
    let post = state
        .service
        .schedule_post(request.into_input(user_identity.id()))
        .await?;
    Ok(Response::created(post))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 400, description = "Post not found", body = ErrorBody),
    )
)]
pub async fn get_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Post>, ApiError> {
    let post = state
        .service
        .get_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(post))
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 400, description = "Not the author, or invalid content", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity, request))]
pub async fn update_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Response<Post>, ApiError> {
    let input = request.into_input(PostId::from(id), user_identity.id());
    let post = state.service.update_post(input).await?;
    Ok(Response::ok(post))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 400, description = "Not the author", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, user_identity))]
pub async fn delete_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .delete_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::deleted(()))
}

#[utoipa::path(
    get,
    path = "/users/me/posts",
    tag = "posts",
    params(
        GetPaginated
    ),
    responses(
        (status = 200, description = "Own posts, pinned first", body = PaginatedResponse<Post>),
    )
)]
pub async fn get_my_posts(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Post>>, ApiError> {
    let (posts, total) = state
        .service
        .get_my_posts(&user_identity.id(), &pagination)
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: posts,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    get,
    path = "/feed",
    tag = "posts",
    params(
        FeedFilter,
        GetPaginated
    ),
    responses(
        (status = 200, description = "Posts from the user, followed users and connections", body = PaginatedResponse<Post>),
    )
)]
pub async fn get_feed(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(filter): Query<FeedFilter>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Post>>, ApiError> {
    let user_id = user_identity.id();
    let (posts, total) = if filter.post_type.is_none() && filter.user_type.is_none() {
        state.service.get_feed(&user_id, &pagination).await?
    } else {
        state
            .service
            .get_filtered_feed(&user_id, &filter, &pagination)
            .await?
    };

    Ok(Response::ok(PaginatedResponse {
        data: posts,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    get,
    path = "/trending",
    tag = "posts",
    params(
        TrendingQuery
    ),
    responses(
        (status = 200, description = "Most engaging posts of the last week", body = Vec<Post>),
    )
)]
pub async fn get_trending_posts(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Response<Vec<Post>>, ApiError> {
    let posts = state.service.get_trending_posts(query.limit).await?;
    Ok(Response::ok(posts))
}

#[utoipa::path(
    get,
    path = "/hashtags/{tag}/posts",
    tag = "posts",
    params(
        ("tag" = String, Path, description = "Hashtag, with or without the leading #"),
        GetPaginated
    ),
    responses(
        (status = 200, description = "Published posts carrying the hashtag", body = PaginatedResponse<Post>),
        (status = 400, description = "Blank hashtag", body = ErrorBody),
    )
)]
pub async fn search_by_hashtag(
    Path(tag): Path<String>,
    State(state): State<AppState>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Post>>, ApiError> {
    let (posts, total) = state.service.search_by_hashtag(&tag, &pagination).await?;

    Ok(Response::ok(PaginatedResponse {
        data: posts,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/pin",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post pinned, any other pinned post of the author unpinned", body = Post),
        (status = 400, description = "Not the author", body = ErrorBody),
    )
)]
pub async fn pin_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Post>, ApiError> {
    let post = state
        .service
        .pin_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(post))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/analytics",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Like, comment and share counts", body = PostAnalytics),
        (status = 400, description = "Post not found", body = ErrorBody),
    )
)]
pub async fn get_analytics(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<PostAnalytics>, ApiError> {
    let analytics = state.service.get_analytics(&PostId::from(id)).await?;
    Ok(Response::ok(analytics))
}

// == Engagement ==

#[utoipa::path(
    post,
    path = "/posts/{id}/likes",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "`changed` is false when the post was already liked", body = ChangedResponse),
        (status = 400, description = "Post not found", body = ErrorBody),
    )
)]
pub async fn like_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .like_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/likes",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "`changed` is false when the post was not liked", body = ChangedResponse),
    )
)]
pub async fn unlike_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<ChangedResponse>, ApiError> {
    let changed = state
        .service
        .unlike_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::ok(ChangedResponse { changed }))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Post not found, or blank or too long text", body = ErrorBody),
    )
)]
pub async fn comment_on_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Response<Comment>, ApiError> {
    let comment = state
        .service
        .comment_on_post(&PostId::from(id), &user_identity.id(), &request.text)
        .await?;
    Ok(Response::created(comment))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/comments",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID"),
        GetPaginated
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = PaginatedResponse<Comment>),
    )
)]
pub async fn get_comments(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Comment>>, ApiError> {
    let (comments, total) = state
        .service
        .get_comments(&PostId::from(id), &pagination)
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: comments,
        total,
        page: pagination.page,
    }))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 400, description = "Neither the comment's nor the post's author", body = ErrorBody),
    )
)]
pub async fn delete_comment(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .delete_comment(&CommentId::from(id), &user_identity.id())
        .await?;
    Ok(Response::deleted(()))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/shares",
    tag = "engagement",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 201, description = "Post shared", body = Share),
        (status = 400, description = "Post not found", body = ErrorBody),
    )
)]
pub async fn share_post(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Share>, ApiError> {
    let share = state
        .service
        .share_post(&PostId::from(id), &user_identity.id())
        .await?;
    Ok(Response::created(share))
}
