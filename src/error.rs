//! Error types for Bookshelf server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 1,
    Duplicate = 2,
    NoSuchData = 3,
    NoSuchBook = 4,
    NoSuchRecord = 5,
    BookInUse = 6,
    ItemNotAvailable = 7,
    MaxBorrowsReached = 8,
    AlreadyBorrowed = 9,
    DbFailure = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Borrow record not found: {0}")]
    RecordNotFound(String),

    #[error("Book in use: {0}")]
    InUse(String),

    #[error("Out of stock: {0}")]
    OutOfStock(String),

    #[error("Borrow limit exceeded: {0}")]
    BorrowLimitExceeded(String),

    #[error("Already borrowed: {0}")]
    AlreadyBorrowed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl AppError {
    /// Error code and HTTP status for this error
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::DuplicateKey(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::RecordNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord),
            AppError::InUse(_) => (StatusCode::CONFLICT, ErrorCode::BookInUse),
            AppError::OutOfStock(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::ItemNotAvailable)
            }
            AppError::BorrowLimitExceeded(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::MaxBorrowsReached)
            }
            AppError::AlreadyBorrowed(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyBorrowed),
            AppError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DbFailure)
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::InvalidInput(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let message = match &self {
            AppError::StoreUnavailable(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::InvalidInput(msg)
            | AppError::DuplicateKey(msg)
            | AppError::NotFound(msg)
            | AppError::BookNotFound(msg)
            | AppError::RecordNotFound(msg)
            | AppError::InUse(msg)
            | AppError::OutOfStock(msg)
            | AppError::BorrowLimitExceeded(msg)
            | AppError::AlreadyBorrowed(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Book name is required"))]
        name: String,
        #[validate(range(min = 0, message = "Quantity cannot be negative"))]
        quantity: i64,
    }

    #[test]
    fn test_validation_errors_become_invalid_input() {
        let sample = Sample { name: String::new(), quantity: -1 };
        let err: AppError = sample.validate().unwrap_err().into();
        match err {
            AppError::InvalidInput(msg) => {
                assert_eq!(msg, "Book name is required; Quantity cannot be negative");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            AppError::OutOfStock("x".into()).classify(),
            (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::ItemNotAvailable)
        );
        assert_eq!(
            AppError::InUse("x".into()).classify(),
            (StatusCode::CONFLICT, ErrorCode::BookInUse)
        );
        assert_eq!(
            AppError::StoreUnavailable(sqlx::Error::PoolTimedOut).classify().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
