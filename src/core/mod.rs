// Core exports
pub mod error;
pub mod filters;
pub mod interests;
pub mod matcher;
pub mod service;
pub mod validation;

pub use error::ServiceError;
pub use filters::{is_match, is_opposite_gender, same_city, shares_interest};
pub use interests::{join_interests, normalize_interests, normalize_stored};
pub use matcher::{MatchResult, Matcher};
pub use service::ProfileService;
pub use validation::{validate_changes, validate_new_profile};
