use serde::{Deserialize, Serialize};
use validator::Validate;

/// Interests as submitted by a client: a JSON array or a comma-delimited string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInterests {
    List(Vec<String>),
    Delimited(String),
}

/// Request to register a profile; every field is required
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: i32,
    pub gender: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
    pub interests: RawInterests,
}

/// Partial profile update; absent or null fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub city: Option<String>,
    #[serde(default)]
    pub interests: Option<RawInterests>,
}

/// Pagination for the profile listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListProfilesQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for ListProfilesQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u32 {
    10
}
