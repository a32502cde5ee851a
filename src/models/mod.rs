// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Gender, InvalidGender, NewProfile, Profile, ProfileChanges, ProfileRecord, RecordError};
pub use requests::{CreateProfileRequest, ListProfilesQuery, RawInterests, UpdateProfileRequest};
pub use responses::{DeleteResponse, ErrorResponse, HealthResponse};
