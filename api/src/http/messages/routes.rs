use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    messages::handlers::{
        __path_block_user, __path_delete_conversation, __path_get_blocked_users,
        __path_get_conversation, __path_get_unread_message_count,
        __path_mark_conversation_as_read, __path_send_message, __path_unblock_user, block_user,
        delete_conversation, get_blocked_users, get_conversation, get_unread_message_count,
        mark_conversation_as_read, send_message, unblock_user,
    },
    server::AppState,
};

pub fn message_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(send_message))
        .routes(routes!(get_unread_message_count))
        .routes(routes!(get_conversation, delete_conversation))
        .routes(routes!(mark_conversation_as_read))
        .routes(routes!(block_user, get_blocked_users))
        .routes(routes!(unblock_user))
}
