use thiserror::Error;

use crate::models::RecordError;
use crate::services::StoreError;

/// Errors surfaced by profile operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Profile with id {0} not found")]
    NotFound(i64),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Store(other),
        }
    }
}

impl From<RecordError> for ServiceError {
    fn from(err: RecordError) -> Self {
        ServiceError::Store(StoreError::CorruptRecord(err.to_string()))
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}
