use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::sheets::SheetsError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Spreadsheet backend is not configured")]
    SheetsNotConfigured,
}

impl AppError {
    /// Error kind reported in the `error` field of the response envelope
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Io(_)
            | AppError::Json(_)
            | AppError::Sheets(_)
            | AppError::TaskJoin(_)
            | AppError::Internal(_) => "StorageError",
            AppError::InvalidInput(_) => "ValidationError",
            AppError::InvalidCategory(_) => "InvalidCategory",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized => "Unauthorized",
            AppError::SheetsNotConfigured => "SheetsNotConfigured",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Implement IntoResponse to convert AppError into the JSON error envelope
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            AppError::Io(ref e) => {
                tracing::error!("Storage I/O error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, storage_failure())
            }
            AppError::Json(ref e) => {
                tracing::error!("Stored table is not valid JSON: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, storage_failure())
            }
            AppError::Sheets(ref e) => {
                tracing::error!("Spreadsheet API error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, storage_failure())
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, storage_failure())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, storage_failure())
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCategory(category) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid type '{}': expected 'waitlist' or 'feedback'", category),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::SheetsNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Spreadsheet storage is not configured on this server".to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": kind,
        }));

        (status, body).into_response()
    }
}

fn storage_failure() -> String {
    "Failed to save or load data. Please try again later.".to_string()
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
