use std::sync::Arc;

use crate::core::error::ServiceError;
use crate::core::matcher::Matcher;
use crate::core::validation::{check_deliverability, validate_changes, validate_new_profile};
use crate::models::{CreateProfileRequest, Profile, UpdateProfileRequest};
use crate::services::ProfileStore;

/// Largest page `list_profiles` will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Profile operations exposed to the transport layer
///
/// Holds no state between calls beyond the injected store handle, so every
/// operation is independently re-entrant.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    matcher: Matcher,
    check_deliverability: bool,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            matcher: Matcher::new(),
            check_deliverability: false,
        }
    }

    /// Resolve email domains over DNS before any write that sets an email
    pub fn with_deliverability_check(mut self, enabled: bool) -> Self {
        self.check_deliverability = enabled;
        self
    }

    async fn ensure_deliverable(&self, email: &str) -> Result<(), ServiceError> {
        if self.check_deliverability {
            check_deliverability(email).await?;
        }
        Ok(())
    }

    pub async fn create_profile(&self, req: CreateProfileRequest) -> Result<Profile, ServiceError> {
        let new_profile = validate_new_profile(req)?;
        self.ensure_deliverable(&new_profile.email).await?;

        let record = self.store.insert(new_profile).await?;

        tracing::info!("Created profile {}", record.id);
        Ok(Profile::try_from(record)?)
    }

    pub async fn get_profile(&self, id: i64) -> Result<Profile, ServiceError> {
        let record = self.store.get(id).await?.ok_or(ServiceError::NotFound(id))?;
        Ok(Profile::try_from(record)?)
    }

    /// A page of profiles in id order; `limit` is capped at [`MAX_PAGE_SIZE`]
    pub async fn list_profiles(&self, skip: u32, limit: u32) -> Result<Vec<Profile>, ServiceError> {
        let records = self.store.list(skip, limit.min(MAX_PAGE_SIZE)).await?;

        records
            .into_iter()
            .map(|record| Profile::try_from(record).map_err(ServiceError::from))
            .collect()
    }

    pub async fn update_profile(
        &self,
        id: i64,
        req: UpdateProfileRequest,
    ) -> Result<Profile, ServiceError> {
        let changes = validate_changes(req)?;

        if changes.is_empty() {
            return self.get_profile(id).await;
        }

        if let Some(email) = changes.email.as_deref() {
            self.ensure_deliverable(email).await?;
        }

        let record = self.store.update(id, changes).await?;

        tracing::info!("Updated profile {}", id);
        Ok(Profile::try_from(record)?)
    }

    pub async fn delete_profile(&self, id: i64) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        Ok(())
    }

    /// Profiles matching `id` under the cross-gender AND
    /// (shared interest OR same city) predicate
    ///
    /// Only a missing subject is a hard failure. Candidates with undecodable
    /// records are skipped.
    pub async fn find_matches(&self, id: i64) -> Result<Vec<Profile>, ServiceError> {
        let subject = self.get_profile(id).await?;
        let candidates = self.store.list_excluding(id).await?;

        let result = self.matcher.find_matches(&subject, candidates);

        if result.skipped > 0 {
            tracing::warn!(
                "Skipped {} unreadable candidates while matching profile {}",
                result.skipped,
                id
            );
        }

        tracing::info!(
            "Returning {} matches for profile {} (from {} candidates)",
            result.matches.len(),
            id,
            result.total_candidates
        );

        Ok(result.matches)
    }

    pub async fn health_check(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}
