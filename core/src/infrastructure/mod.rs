use crate::domain::common::CoreError;

pub mod health;
pub mod message;
pub mod network;
pub mod notification;
pub mod post;
pub mod user;

pub(crate) fn database_error(error: sqlx::Error) -> CoreError {
    CoreError::DatabaseError {
        msg: error.to_string(),
    }
}
