use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    server::AppState,
    users::handlers::{
        __path_change_password, __path_get_me, __path_list_security_questions, __path_login,
        __path_register, __path_reset_password, __path_search_users, __path_set_security_answer,
        __path_update_privacy, __path_update_profile, __path_view_profile, change_password,
        get_me, list_security_questions, login, register, reset_password, search_users,
        set_security_answer, update_privacy, update_profile, view_profile,
    },
};

/// Routes reachable without a token.
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
        .routes(routes!(reset_password))
        .routes(routes!(list_security_questions))
}

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me))
        .routes(routes!(change_password))
        .routes(routes!(set_security_answer))
        .routes(routes!(update_privacy))
        .routes(routes!(update_profile))
        .routes(routes!(view_profile))
        .routes(routes!(search_users))
}
