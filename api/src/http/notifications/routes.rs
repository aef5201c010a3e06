use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    notifications::handlers::{
        __path_get_notifications, __path_get_preferences, __path_get_unread_count,
        __path_mark_all_as_read, __path_mark_as_read, __path_update_preferences,
        get_notifications, get_preferences, get_unread_count, mark_all_as_read, mark_as_read,
        update_preferences,
    },
    server::AppState,
};

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_notifications))
        .routes(routes!(get_unread_count))
        .routes(routes!(mark_as_read))
        .routes(routes!(mark_all_as_read))
        .routes(routes!(get_preferences, update_preferences))
}
