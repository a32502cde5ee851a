use std::collections::BTreeSet;

use crate::core::error::ServiceError;
use crate::models::RawInterests;

/// Separator used by the single-string and storage forms
pub const INTEREST_DELIMITER: char = ',';

/// Longest accepted token, in characters, after cleaning
pub const MAX_INTEREST_LENGTH: usize = 30;

/// Normalize interests submitted on the write path
///
/// Each item is stripped of everything except alphanumerics, underscores and
/// whitespace, trimmed, length-bounded and lowercased. Duplicates collapse.
///
/// # Errors
/// `ServiceError::Validation` when nothing survives cleaning.
pub fn normalize_interests(raw: &RawInterests) -> Result<BTreeSet<String>, ServiceError> {
    let tokens = match raw {
        RawInterests::List(items) => normalize_items(items.iter().map(String::as_str)),
        RawInterests::Delimited(text) => normalize_items(split_delimited(text)),
    };

    if tokens.is_empty() {
        return Err(ServiceError::Validation("no valid interests provided".to_string()));
    }

    Ok(tokens)
}

/// Normalize the comma-joined storage field on the read path
///
/// Never fails: an empty result just means "no interests".
pub fn normalize_stored(stored: &str) -> BTreeSet<String> {
    normalize_items(split_delimited(stored))
}

/// Storage encoding of a normalized set
pub fn join_interests(tokens: &BTreeSet<String>) -> String {
    let mut joined = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            joined.push(INTEREST_DELIMITER);
        }
        joined.push_str(token);
    }
    joined
}

fn normalize_items<'a, I>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    items.into_iter().filter_map(clean_token).collect()
}

/// An empty string has no items, not a single empty one
fn split_delimited(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = text.split(INTEREST_DELIMITER);
    if text.is_empty() {
        parts.next();
    }
    parts
}

#[inline]
fn is_kept_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace()
}

fn clean_token(item: &str) -> Option<String> {
    let stripped: String = item.chars().filter(|c| is_kept_char(*c)).collect();
    let trimmed = stripped.trim();

    if trimmed.is_empty() || trimmed.chars().count() > MAX_INTEREST_LENGTH {
        return None;
    }

    Some(trimmed.to_lowercase())
}
