use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::repository::StoreError;
use crate::utils::response::error as error_response;
use crate::utils::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Storage error")]
    StorageError(#[from] StoreError),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl AppError {
    pub fn event_not_found(id: i64) -> Self {
        AppError::NotFound(format!("Event with id '{}' was not found", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::CapacityExceeded(_) => StatusCode::CONFLICT,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::CapacityExceeded(_) => "CAPACITY_EXCEEDED",
            AppError::StorageError(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(errors) => {
                warn!(code = self.code(), errors = %errors, "Request rejected");
            }
            AppError::NotFound(msg)
            | AppError::InvalidState(msg)
            | AppError::CapacityExceeded(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::StorageError(e) => {
                error!(error = ?e, "Storage error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let (public_message, details) = match &self {
            AppError::ValidationError(errors) => (
                "Request validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::NotFound(msg)
            | AppError::InvalidState(msg)
            | AppError::CapacityExceeded(msg) => (msg.clone(), None),
            // Storage internals stay in the logs.
            AppError::StorageError(_) => ("A database error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_failure_kind() {
        let invalid = AppError::from(ValidationErrors::single("title", "is required"));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "VALIDATION_ERROR");

        let missing = AppError::event_not_found(42);
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Resource not found: Event with id '42' was not found");

        let state = AppError::InvalidState("closed".into());
        let full = AppError::CapacityExceeded("full".into());
        assert_eq!(state.status_code(), StatusCode::CONFLICT);
        assert_eq!(full.status_code(), StatusCode::CONFLICT);
        assert_ne!(state.code(), full.code());
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = AppError::from(StoreError::Corrupt("bad category 'X'".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
