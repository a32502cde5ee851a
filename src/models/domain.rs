use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::interests::normalize_stored;

/// Canonical gender tag used by the cross-gender match filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the two gender tags
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gender must be either \"male\" or \"female\"")]
pub struct InvalidGender;

impl FromStr for Gender {
    type Err = InvalidGender;

    /// Case-insensitive: "Male", "FEMALE" and "female" are all accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(InvalidGender),
        }
    }
}

/// Profile row as it sits in the store
///
/// Nothing here is trusted: historical rows may carry gender tags or interest
/// strings that today's write path would reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub email: String,
    pub city: String,
    /// Comma-joined interest tokens
    pub interests: String,
}

/// Profile as exposed to API callers and the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub email: String,
    pub city: String,
    pub interests: Vec<String>,
}

impl Profile {
    pub fn has_interest(&self, token: &str) -> bool {
        self.interests.iter().any(|i| i == token)
    }
}

/// A stored record that cannot be turned into a [`Profile`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("profile {id} has unknown gender tag {value:?}")]
    InvalidGender { id: i64, value: String },
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = RecordError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let gender = record
            .gender
            .parse::<Gender>()
            .map_err(|_| RecordError::InvalidGender {
                id: record.id,
                value: record.gender.clone(),
            })?;

        Ok(Profile {
            id: record.id,
            name: record.name,
            age: record.age,
            gender,
            email: record.email,
            city: record.city,
            interests: normalize_stored(&record.interests).into_iter().collect(),
        })
    }
}

/// Fully validated profile ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub email: String,
    pub city: String,
    /// Already normalized and comma-joined
    pub interests: String,
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub interests: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.email.is_none()
            && self.city.is_none()
            && self.interests.is_none()
    }

    /// Overwrite the supplied fields of `record`
    pub fn apply_to(&self, record: &mut ProfileRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(gender) = self.gender {
            record.gender = gender.as_str().to_string();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(city) = &self.city {
            record.city = city.clone();
        }
        if let Some(interests) = &self.interests {
            record.interests = interests.clone();
        }
    }
}
