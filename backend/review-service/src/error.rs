use crate::book_client::ProxyError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use catalog_common::{describe_validation, error_response};
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ProxyError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Upstream and internal details stay in the logs
        let message = match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Upstream(_) => "Book service unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        };
        error_response(self.status_code(), message)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(describe_validation(&errors))
    }
}

pub fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Review with ID {} not found", id))
}
