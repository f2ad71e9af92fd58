use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer. Each variant maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is not logged in.
    #[error("authentication required")]
    Unauthorized,
    /// The caller is logged in but may not perform the action.
    #[error("permission denied")]
    Forbidden,
    #[error("not found")]
    NotFound,
    /// The submitted payload failed validation.
    #[error("{0}")]
    Form(String),
    /// The record or association already exists.
    #[error("{0}")]
    Duplicate(String),
    /// The association the caller wants to remove does not exist.
    #[error("{0}")]
    NotAssociated(String),
    #[error("you cannot subscribe to yourself")]
    SelfSubscription,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Duplicate(message) => ServiceError::Duplicate(message),
            RepositoryError::ConstraintViolation(message) => ServiceError::Form(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
