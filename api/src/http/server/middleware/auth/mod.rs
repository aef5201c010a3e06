use axum::{extract::FromRequestParts, http::request::Parts};

use crate::http::server::{ApiError, AppState};
pub mod entities;

pub struct AuthMiddleware;

impl FromRequestParts<AppState> for AuthMiddleware {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        tracing::debug!(
            "Authentication middleware: checking request to {}",
            parts.uri
        );

        let Some(auth_header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
            tracing::warn!("Authentication failed: Authorization header missing");
            return Err(ApiError::Unauthorized);
        };

        let auth_value = auth_header.to_str().map_err(|e| {
            tracing::warn!(
                "Authentication failed: Authorization header is not valid UTF-8: {}",
                e
            );
            ApiError::Unauthorized
        })?;

        let token = auth_value.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Authentication failed: Authorization header doesn't start with 'Bearer '");
            ApiError::Unauthorized
        })?;

        let claims = state.jwt.verify(token).map_err(|e| {
            tracing::warn!("Authentication failed: token rejected: {}", e);
            ApiError::Unauthorized
        })?;

        tracing::debug!("Authentication successful for user: {}", claims.sub);

        parts.extensions.insert(entities::UserIdentity {
            user_id: claims.sub,
        });
        Ok(Self)
    }
}
