//! Kindred - profile registry and match finder for the Kindred dating app
//!
//! Profiles are registered with a normalized interest set; matches for a
//! profile are every opposite-gender profile that shares an interest or lives
//! in the same city.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize_interests, normalize_stored, Matcher, ProfileService, ServiceError};
pub use models::{Gender, Profile, ProfileRecord, RawInterests};
pub use services::{InMemoryProfileStore, PostgresProfileStore, ProfileStore, StoreError};
