//! Error taxonomy for the JSON API.
//!
//! Unauthorized is surfaced before any store access; NotFound never carries
//! a partial result. Store failures map to a generic 500 and are logged;
//! the server never retries internally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::db::DbLockError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("database unavailable")]
    DbUnavailable(#[from] DbLockError),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::DbUnavailable(_) | ApiError::Db(_) | ApiError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
