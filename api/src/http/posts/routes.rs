use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    posts::handlers::{
        __path_comment_on_post, __path_create_post, __path_delete_comment, __path_delete_post,
        __path_get_analytics, __path_get_comments, __path_get_feed, __path_get_my_posts,
        __path_get_post, __path_get_trending_posts, __path_like_post, __path_pin_post,
        __path_schedule_post, __path_search_by_hashtag, __path_share_post, __path_unlike_post,
        __path_update_post, comment_on_post, create_post, delete_comment, delete_post,
        get_analytics, get_comments, get_feed, get_my_posts, get_post, get_trending_posts,
        like_post, pin_post, schedule_post, search_by_hashtag, share_post, unlike_post,
        update_post,
    },
    server::AppState,
};

pub fn post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_post))
        .routes(routes!(schedule_post))
        .routes(routes!(get_post, update_post, delete_post))
        .routes(routes!(get_my_posts))
        .routes(routes!(get_feed))
        .routes(routes!(get_trending_posts))
        .routes(routes!(search_by_hashtag))
        .routes(routes!(pin_post))
        .routes(routes!(get_analytics))
        .routes(routes!(like_post, unlike_post))
        .routes(routes!(comment_on_post, get_comments))
        .routes(routes!(delete_comment))
        .routes(routes!(share_post))
}
