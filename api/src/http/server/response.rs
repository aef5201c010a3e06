use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use revconnect_core::TotalPaginatedElements;
use serde::Serialize;
use utoipa::ToSchema;

/// A JSON payload paired with the status it is sent with.
#[derive(Debug)]
pub struct Response<T> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }

    pub fn deleted(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> AxumResponse {
        (self.status, Json(self.data)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: ToSchema> {
    pub data: Vec<T>,
    pub total: TotalPaginatedElements,
    pub page: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

/// Whether a toggle-style action (like, follow, block, ...) changed anything.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangedResponse {
    pub changed: bool,
}
