use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::models::{NewProfile, ProfileChanges, ProfileRecord};
use crate::services::store::{email_conflict, ProfileStore, StoreError};

const PROFILE_COLUMNS: &str = "id, name, age, gender, email, city, interests";

/// PostgreSQL-backed profile store
///
/// Every statement checks a connection out of the pool and returns it when
/// the statement finishes, on success and on error alike.
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Map a unique violation on `email` to a conflict
fn map_write_error(err: sqlx::Error, email: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return email_conflict(email.unwrap_or("<unknown>"));
        }
    }
    StoreError::SqlxError(err)
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get(&self, id: i64) -> Result<Option<ProfileRecord>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<ProfileRecord>, StoreError> {
        let query = format!(
            "SELECT {} FROM profiles ORDER BY id LIMIT $1 OFFSET $2",
            PROFILE_COLUMNS
        );

        let records = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(limit as i64)
            .bind(skip as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn list_excluding(&self, id: i64) -> Result<Vec<ProfileRecord>, StoreError> {
        let query = format!(
            "SELECT {} FROM profiles WHERE id <> $1 ORDER BY id",
            PROFILE_COLUMNS
        );

        let records = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} candidates excluding {}", records.len(), id);

        Ok(records)
    }

    async fn insert(&self, profile: NewProfile) -> Result<ProfileRecord, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles (name, age, gender, email, city, interests)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(&profile.name)
            .bind(profile.age)
            .bind(profile.gender.as_str())
            .bind(&profile.email)
            .bind(&profile.city)
            .bind(&profile.interests)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(&profile.email)))
    }

    async fn update(&self, id: i64, changes: ProfileChanges) -> Result<ProfileRecord, StoreError> {
        // NULL parameters keep the stored column
        let query = format!(
            r#"
            UPDATE profiles SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                email = COALESCE($5, email),
                city = COALESCE($6, city),
                interests = COALESCE($7, interests)
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.age)
            .bind(changes.gender.map(|g| g.as_str()))
            .bind(changes.email.as_deref())
            .bind(changes.city.as_deref())
            .bind(changes.interests.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, changes.email.as_deref()))?
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::info!("Deleted profile {}", id);
        Ok(())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    #[test]
    fn test_non_database_errors_are_not_conflicts() {
        let err = map_write_error(sqlx::Error::RowNotFound, Some("a@example.com"));
        assert!(matches!(err, StoreError::SqlxError(_)));
    }

    // The tests below need a live PostgreSQL; run with
    // DATABASE_URL=postgres://... cargo test -- --ignored

    async fn connect() -> Option<PostgresProfileStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        Some(
            PostgresProfileStore::from_settings(&url, Some(2), Some(1), None, None)
                .await
                .unwrap(),
        )
    }

    fn new_profile(email: &str) -> NewProfile {
        NewProfile {
            name: "Ana".to_string(),
            age: 29,
            gender: Gender::Female,
            email: email.to_string(),
            city: "Paris".to_string(),
            interests: "art,chess".to_string(),
        }
    }

    fn unique_email(tag: &str) -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{}-{}@example.com", tag, nanos)
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_insert_is_conflict() {
        let Some(store) = connect().await else { return };
        let email = unique_email("dup");

        let first = store.insert(new_profile(&email)).await.unwrap();
        let second = store.insert(new_profile(&email)).await;

        assert!(matches!(second, Err(StoreError::Conflict(_))));
        store.delete(first.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_partial_update_keeps_other_columns() {
        let Some(store) = connect().await else { return };
        let created = store.insert(new_profile(&unique_email("partial"))).await.unwrap();

        let updated = store
            .update(
                created.id,
                ProfileChanges {
                    city: Some("Lyon".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.city, "Lyon");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.age, created.age);
        assert_eq!(updated.gender, created.gender);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.interests, created.interests);

        store.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_to_taken_email_is_conflict() {
        let Some(store) = connect().await else { return };
        let taken = store.insert(new_profile(&unique_email("taken"))).await.unwrap();
        let other = store.insert(new_profile(&unique_email("other"))).await.unwrap();

        let result = store
            .update(
                other.id,
                ProfileChanges {
                    email: Some(taken.email.clone()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // The failed update left the row untouched
        let unchanged = store.get(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, other.email);

        store.delete(taken.id).await.unwrap();
        store.delete(other.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_of_missing_row_is_not_found() {
        let Some(store) = connect().await else { return };

        let result = store
            .update(
                i64::MAX,
                ProfileChanges {
                    city: Some("Nice".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
