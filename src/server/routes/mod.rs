mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::{Category, StoreError};

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

pub type ApiResponse<T> = Result<T, ApiError>;

/// Failures surfaced to clients. Each variant has a fixed status and message;
/// the wrapped cause is only logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest(anyhow::Error),
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable(anyhow::Error),
    #[error("internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn bad_request(cause: impl Into<anyhow::Error>) -> Self {
        Self::BadRequest(cause.into())
    }

    pub fn unprocessable(cause: impl Into<anyhow::Error>) -> Self {
        Self::Unprocessable(cause.into())
    }

    /// Numeric code reported in the error body.
    pub fn code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Unprocessable(_) => 422,
            Self::Internal(_) => 500,
        }
    }

    /// HTTP status of the response. Internal errors go out as 422, the same
    /// status existing clients already handle for failed writes.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable(_) | Self::Internal(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(cause) => tracing::error!(code = self.code(), "{:#}", cause),
            Self::BadRequest(cause) | Self::Unprocessable(cause) => {
                tracing::warn!(code = self.code(), "{:#}", cause)
            }
            Self::NotFound | Self::MethodNotAllowed => tracing::debug!(code = self.code(), "{}", self),
        }
        let body = ErrorBody {
            success: false,
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => ApiError::NotFound,
            e @ StoreError::Validation(_) => ApiError::Unprocessable(e.into()),
            e @ StoreError::Storage(_) => ApiError::Internal(e.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(anyhow::anyhow!(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(anyhow::anyhow!(rejection.body_text()))
    }
}

/// JSON body whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn category_labels(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_api_errors() {
        let not_found = ApiError::from(StoreError::NotFound {
            entity: "question",
            id: 1,
        });
        assert_eq!(not_found.code(), 404);

        let invalid = ApiError::from(StoreError::Validation("category".into()));
        assert_eq!(invalid.code(), 422);

        let storage = ApiError::from(StoreError::Storage(sqlx::Error::PoolClosed));
        assert_eq!(storage.code(), 500);
        assert_eq!(storage.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(storage.to_string(), "internal server error");
    }

    #[test]
    fn messages_are_fixed_per_code() {
        assert_eq!(ApiError::bad_request(anyhow::anyhow!("x")).to_string(), "bad request");
        assert_eq!(ApiError::NotFound.to_string(), "resource not found");
        assert_eq!(ApiError::MethodNotAllowed.to_string(), "method not allowed");
        assert_eq!(ApiError::unprocessable(anyhow::anyhow!("x")).to_string(), "unprocessable");
    }
}
