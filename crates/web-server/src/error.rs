use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;
use tracing;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] CoreError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Converts our custom `AppError` into an HTTP response with a `{"error": ...}` body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Database(DbError::Validation(message)) => (StatusCode::BAD_REQUEST, message),
            AppError::Database(DbError::Conflict(message)) => (StatusCode::CONFLICT, message),
            AppError::Database(DbError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
