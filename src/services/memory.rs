use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewProfile, ProfileChanges, ProfileRecord};
use crate::services::store::{email_conflict, ProfileStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    profiles: BTreeMap<i64, ProfileRecord>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.profiles
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

/// Process-local profile store
///
/// Mirrors the Postgres store's semantics (unique email, id order) and is
/// used for tests, benches and the `memory` backend.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    state: RwLock<MemoryState>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw records, bypassing validation
    ///
    /// Lets callers reproduce historical or dirty data.
    pub fn with_records(records: Vec<ProfileRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let profiles = records.into_iter().map(|r| (r.id, r)).collect();

        Self {
            state: RwLock::new(MemoryState { next_id, profiles }),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, StoreError> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<ProfileRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_excluding(&self, id: i64) -> Result<Vec<ProfileRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| p.id != id)
            .cloned()
            .collect())
    }

    async fn insert(&self, profile: NewProfile) -> Result<ProfileRecord, StoreError> {
        let mut state = self.state.write().await;

        if state.email_taken(&profile.email, None) {
            return Err(email_conflict(&profile.email));
        }

        state.next_id += 1;
        let record = ProfileRecord {
            id: state.next_id,
            name: profile.name,
            age: profile.age,
            gender: profile.gender.as_str().to_string(),
            email: profile.email,
            city: profile.city,
            interests: profile.interests,
        };
        state.profiles.insert(record.id, record.clone());

        tracing::debug!("Inserted profile {}", record.id);
        Ok(record)
    }

    async fn update(&self, id: i64, changes: ProfileChanges) -> Result<ProfileRecord, StoreError> {
        let mut state = self.state.write().await;

        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(email_conflict(email));
            }
        }

        let record = state.profiles.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        changes.apply_to(record);

        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .profiles
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
