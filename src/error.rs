use crate::services::{AuthServiceError, ProductServiceError, UserServiceError};
use crate::validators::{ValidationErrors, BODY_FIELD};
use axum::extract::rejection::JsonRejection;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure classification shared by every handler.
///
/// Each resource decides how a kind maps to a status code and envelope;
/// see `handlers::users::UserApiError` and `handlers::products::ProductApiError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-constraint payload
    #[error("{0}")]
    Validation(ValidationErrors),

    /// No row for the requested id
    #[error("Record not found")]
    NotFound,

    /// Unique-field collision
    #[error("{0}")]
    Conflict(String),

    /// Credential check failed
    #[error("Invalid credentials or account is inactive")]
    Unauthorized,

    /// Anything else, including store connectivity failures
    #[error("{0}")]
    Unclassified(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single(BODY_FIELD, rejection.body_text()))
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UserNotFound => AppError::NotFound,
            UserServiceError::EmailTaken => AppError::Conflict(err.to_string()),
            UserServiceError::HashingError(_) | UserServiceError::RepositoryError(_) => {
                AppError::Unclassified(err.to_string())
            }
        }
    }
}

impl From<ProductServiceError> for AppError {
    fn from(err: ProductServiceError) -> Self {
        match err {
            ProductServiceError::ProductNotFound => AppError::NotFound,
            ProductServiceError::RepositoryError(_) => AppError::Unclassified(err.to_string()),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        AppError::Unclassified(err.to_string())
    }
}
