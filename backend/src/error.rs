use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::RepositoryError;
use crate::models::TodoError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("todo is already marked as done")]
    AlreadyDone,

    #[error("todo completion cannot be higher than 100")]
    CompletionTooHigh,

    #[error("Invalid input: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Persistence failure: {0}")]
    Persistence(RepositoryError),
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::AlreadyDone => AppError::AlreadyDone,
            TodoError::CompletionTooHigh => AppError::CompletionTooHigh,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound,
            other => AppError::Persistence(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(RepositoryError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("not able to unmarshal: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::BadRequest("not able to parse id parameter".to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(ValidationErrorResponse { errors }))
                    .into_response();
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "not able to find todo with given id".to_string(),
            ),
            AppError::AlreadyDone => (
                StatusCode::BAD_REQUEST,
                "todo is already marked as done".to_string(),
            ),
            AppError::CompletionTooHigh => (
                StatusCode::BAD_REQUEST,
                "todo completion cannot be higher than 100".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Persistence(RepositoryError::Timeout(after)) => {
                warn!("storage timed out after {:?}", after);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage is temporarily unavailable".to_string(),
                )
            }
            AppError::Persistence(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
