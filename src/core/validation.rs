//! Write-path validation.
//!
//! Every check runs before the store is touched, so a rejected request never
//! leaves a partial write behind.

use validator::Validate;

use crate::core::error::ServiceError;
use crate::core::interests::{join_interests, normalize_interests};
use crate::models::{CreateProfileRequest, Gender, NewProfile, ProfileChanges, UpdateProfileRequest};

/// Reserved top-level domains that never receive mail
pub const SPECIAL_USE_TLDS: &[&str] = &["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Validate a create request into an insertable profile
pub fn validate_new_profile(mut req: CreateProfileRequest) -> Result<NewProfile, ServiceError> {
    req.email = req.email.trim().to_string();
    req.validate()?;

    let name = validate_name(req.name)?;
    let gender = parse_gender(&req.gender)?;
    let email = normalize_email(&req.email)?;
    let interests = normalize_interests(&req.interests)?;

    Ok(NewProfile {
        name,
        age: req.age,
        gender,
        email,
        city: req.city,
        interests: join_interests(&interests),
    })
}

/// Validate only the supplied fields of an update request
pub fn validate_changes(mut req: UpdateProfileRequest) -> Result<ProfileChanges, ServiceError> {
    req.email = req.email.map(|e| e.trim().to_string());
    req.validate()?;

    Ok(ProfileChanges {
        name: req.name.map(validate_name).transpose()?,
        age: req.age,
        gender: req.gender.as_deref().map(parse_gender).transpose()?,
        email: req.email.as_deref().map(normalize_email).transpose()?,
        city: req.city,
        interests: req
            .interests
            .as_ref()
            .map(|raw| normalize_interests(raw).map(|tokens| join_interests(&tokens)))
            .transpose()?,
    })
}

fn validate_name(name: String) -> Result<String, ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name must not be blank".to_string()));
    }
    Ok(name)
}

fn parse_gender(value: &str) -> Result<Gender, ServiceError> {
    value
        .parse::<Gender>()
        .map_err(|e| ServiceError::Validation(e.to_string()))
}

fn invalid_email(email: &str, reason: &str) -> ServiceError {
    ServiceError::Validation(format!("Invalid email address: {}: {}", email, reason))
}

/// Lowercase the domain part and reject domains that cannot receive mail
///
/// The local part keeps its case. Input is expected to be trimmed already.
fn normalize_email(email: &str) -> Result<String, ServiceError> {
    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| invalid_email(email, "missing @"))?;

    if local.is_empty() || domain.is_empty() {
        return Err(invalid_email(email, "empty local part or domain"));
    }

    let domain = domain.to_lowercase();
    check_domain_shape(&domain).map_err(|reason| invalid_email(email, reason))?;

    Ok(format!("{}@{}", local, domain))
}

/// Offline deliverability rules: a dotted name outside the special-use TLDs
fn check_domain_shape(domain: &str) -> Result<(), &'static str> {
    // IP literals such as [127.0.0.1] are not deliverable addresses here
    if domain.starts_with('[') {
        return Err("address literals are not accepted");
    }

    let tld = match domain.rsplit_once('.') {
        Some((_, tld)) if !tld.is_empty() => tld,
        _ => return Err("the domain name must contain a dot and a top-level domain"),
    };

    if SPECIAL_USE_TLDS.contains(&tld) {
        return Err("the domain name is a special-use or reserved name");
    }

    Ok(())
}

/// Resolve the email's domain; a domain with no A/AAAA records cannot
/// receive mail
pub async fn check_deliverability(email: &str) -> Result<(), ServiceError> {
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .ok_or_else(|| invalid_email(email, "missing @"))?;

    match tokio::net::lookup_host((domain, 25)).await {
        Ok(mut addrs) => {
            if addrs.next().is_some() {
                Ok(())
            } else {
                Err(invalid_email(email, "the domain name does not resolve"))
            }
        }
        Err(e) => {
            tracing::debug!("DNS lookup for {} failed: {}", domain, e);
            Err(invalid_email(email, "the domain name does not resolve"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawInterests;

    fn create_request() -> CreateProfileRequest {
        CreateProfileRequest {
            name: "Ana".to_string(),
            age: 29,
            gender: "Female".to_string(),
            email: "Ana.Silva@Example.COM".to_string(),
            city: "Paris".to_string(),
            interests: RawInterests::List(vec!["Chess".into(), "chess!".into(), "Art".into()]),
        }
    }

    #[test]
    fn test_valid_create_is_normalized() {
        let profile = validate_new_profile(create_request()).unwrap();

        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.email, "Ana.Silva@example.com");
        assert_eq!(profile.interests, "art,chess");
    }

    #[test]
    fn test_age_out_of_range() {
        for age in [17, 101, -5] {
            let mut req = create_request();
            req.age = age;
            assert!(matches!(validate_new_profile(req), Err(ServiceError::Validation(_))));
        }
    }

    #[test]
    fn test_age_bounds_inclusive() {
        for age in [18, 100] {
            let mut req = create_request();
            req.age = age;
            assert!(validate_new_profile(req).is_ok());
        }
    }

    #[test]
    fn test_invalid_gender() {
        let mut req = create_request();
        req.gender = "unknown".to_string();
        let err = validate_new_profile(req).unwrap_err();
        assert!(err.to_string().contains("gender must be either"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut req = create_request();
        req.name = "   ".to_string();
        assert!(matches!(validate_new_profile(req), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_long_city_rejected() {
        let mut req = create_request();
        req.city = "x".repeat(51);
        assert!(matches!(validate_new_profile(req), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_padded_email_is_trimmed() {
        let mut req = create_request();
        req.email = "  ana@Example.com ".to_string();
        assert_eq!(validate_new_profile(req).unwrap().email, "ana@example.com");

        let changes = validate_changes(UpdateProfileRequest {
            email: Some(" bo@Mail.Example.org".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.email.as_deref(), Some("bo@mail.example.org"));
    }

    #[test]
    fn test_undeliverable_domains_rejected() {
        for email in [
            "ana@localhost",
            "ana@no-such-domain-zzqx-123456.invalid",
            "ana@mail.test",
            "ana@printer.LOCAL",
        ] {
            let mut req = create_request();
            req.email = email.to_string();
            let err = validate_new_profile(req).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{} was accepted", email);
        }

        let result = validate_changes(UpdateProfileRequest {
            email: Some("ana@localhost".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_domain_shape() {
        assert!(check_domain_shape("example.com").is_ok());
        assert!(check_domain_shape("mail.example.co.uk").is_ok());
        assert!(check_domain_shape("localhost").is_err());
        assert!(check_domain_shape("example.").is_err());
        assert!(check_domain_shape("[127.0.0.1]").is_err());
        assert!(check_domain_shape("host.onion").is_err());
    }

    #[tokio::test]
    async fn test_deliverability_rejects_malformed_address() {
        assert!(matches!(
            check_deliverability("no-at-sign").await,
            Err(ServiceError::Validation(_))
        ));
    }

    // Needs a working resolver
    #[tokio::test]
    #[ignore]
    async fn test_deliverability_resolves_real_domains() {
        assert!(check_deliverability("someone@example.com").await.is_ok());
        assert!(check_deliverability("someone@no-such-domain-zzqx-123456.com").await.is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut req = create_request();
        req.email = "not-an-email".to_string();
        assert!(matches!(validate_new_profile(req), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_interests_normalizing_to_empty_rejected() {
        let mut req = create_request();
        req.interests = RawInterests::List(vec!["!!!".into(), "y".repeat(40)]);
        let err = validate_new_profile(req).unwrap_err();
        assert!(err.to_string().contains("no valid interests provided"));
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let changes = validate_changes(UpdateProfileRequest {
            gender: Some("MALE".to_string()),
            interests: Some(RawInterests::Delimited("Go,rust".to_string())),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(changes.gender, Some(Gender::Male));
        assert_eq!(changes.interests.as_deref(), Some("go,rust"));
        assert!(changes.name.is_none());
        assert!(changes.email.is_none());
    }

    #[test]
    fn test_changes_with_empty_interests_rejected() {
        let result = validate_changes(UpdateProfileRequest {
            interests: Some(RawInterests::Delimited(String::new())),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_changes_validate_age() {
        let result = validate_changes(UpdateProfileRequest {
            age: Some(12),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
