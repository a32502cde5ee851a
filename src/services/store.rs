use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewProfile, ProfileChanges, ProfileRecord};

/// Errors that can occur when interacting with the profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Profile {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

pub(crate) fn email_conflict(email: &str) -> StoreError {
    StoreError::Conflict(format!("Email already registered: {}", email))
}

/// Persistence collaborator for profiles
///
/// Implementations hand back raw [`ProfileRecord`]s; decoding and
/// normalization happen above this layer. Listing methods return records in
/// ascending id order.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, StoreError>;

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<ProfileRecord>, StoreError>;

    /// Every profile except `id`
    async fn list_excluding(&self, id: i64) -> Result<Vec<ProfileRecord>, StoreError>;

    /// Fails with `StoreError::Conflict` when the email is taken
    async fn insert(&self, profile: NewProfile) -> Result<ProfileRecord, StoreError>;

    /// Fails with `StoreError::NotFound` or `StoreError::Conflict`
    async fn update(&self, id: i64, changes: ProfileChanges) -> Result<ProfileRecord, StoreError>;

    /// Fails with `StoreError::NotFound`
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
