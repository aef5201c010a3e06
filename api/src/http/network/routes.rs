use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    network::handlers::{
        __path_accept_connection_request, __path_follow_user, __path_get_connections,
        __path_get_followers, __path_get_following, __path_get_pending_requests,
        __path_reject_connection_request, __path_remove_connection,
        __path_send_connection_request, __path_unfollow_user, accept_connection_request,
        follow_user, get_connections, get_followers, get_following, get_pending_requests,
        reject_connection_request, remove_connection, send_connection_request, unfollow_user,
    },
    server::AppState,
};

pub fn network_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(send_connection_request, get_pending_requests))
        .routes(routes!(accept_connection_request))
        .routes(routes!(reject_connection_request))
        .routes(routes!(get_connections))
        .routes(routes!(remove_connection))
        .routes(routes!(follow_user, unfollow_user))
        .routes(routes!(get_followers))
        .routes(routes!(get_following))
}
