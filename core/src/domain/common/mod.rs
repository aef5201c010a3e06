use serde::Deserialize;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

pub mod mock;
pub mod password;
pub mod services;
pub mod validation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Bad input or a broken business rule. The message is meant for the end user.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or an unknown account.
    #[error("{0}")]
    Authentication(String),

    #[error("Service is currently unavailable")]
    ServiceUnavailable(String),

    #[error("Health check failed")]
    Unhealthy,

    #[error("Database error: {msg}")]
    DatabaseError { msg: String },

    #[error("Password hashing failed: {msg}")]
    PasswordHash { msg: String },
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        CoreError::Authentication(msg.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "E_VALIDATION",
            CoreError::Authentication(_) => "E_AUTHENTICATION",
            CoreError::ServiceUnavailable(_) | CoreError::Unhealthy => "E_SERVICE_UNAVAILABLE",
            CoreError::DatabaseError { .. } => "E_DATABASE",
            CoreError::PasswordHash { .. } => "E_PASSWORD_HASH",
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetPaginated {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const MAX_PAGE_SIZE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for GetPaginated {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl GetPaginated {
    /// Page size, clamped to `1..=100`.
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows to skip. Page numbers start at 1; page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit())
    }

    /// Applies this page to an already filtered, already ordered list.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, TotalPaginatedElements) {
        let total = items.len() as TotalPaginatedElements;
        let page = items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect();
        (page, total)
    }
}

pub type TotalPaginatedElements = u64;

/// Maximum text lengths, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    pub max_post_length: usize,
    pub max_comment_length: usize,
    pub max_message_length: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            max_post_length: 5000,
            max_comment_length: 1000,
            max_message_length: 1000,
        }
    }
}
