use crate::models::Profile;

/// Same-gender pairs never match
#[inline]
pub fn is_opposite_gender(subject: &Profile, candidate: &Profile) -> bool {
    subject.gender != candidate.gender
}

/// True when the two profiles have at least one normalized interest in common
#[inline]
pub fn shares_interest(subject: &Profile, candidate: &Profile) -> bool {
    candidate
        .interests
        .iter()
        .any(|token| subject.has_interest(token))
}

/// Exact, case-sensitive comparison of the stored city values
#[inline]
pub fn same_city(subject: &Profile, candidate: &Profile) -> bool {
    subject.city == candidate.city
}

/// The match predicate: cross-gender AND (shared interest OR same city)
#[inline]
pub fn is_match(subject: &Profile, candidate: &Profile) -> bool {
    is_opposite_gender(subject, candidate)
        && (shares_interest(subject, candidate) || same_city(subject, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn create_test_profile(id: i64, gender: Gender, city: &str, interests: &[&str]) -> Profile {
        Profile {
            id,
            name: format!("User {}", id),
            age: 30,
            gender,
            email: format!("user{}@example.com", id),
            city: city.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_opposite_gender() {
        let subject = create_test_profile(1, Gender::Male, "Paris", &[]);
        let female = create_test_profile(2, Gender::Female, "Paris", &[]);
        let male = create_test_profile(3, Gender::Male, "Paris", &[]);

        assert!(is_opposite_gender(&subject, &female));
        assert!(!is_opposite_gender(&subject, &male));
    }

    #[test]
    fn test_shared_interest() {
        let subject = create_test_profile(1, Gender::Male, "Paris", &["chess", "hiking"]);
        let hit = create_test_profile(2, Gender::Female, "Lyon", &["chess"]);
        let miss = create_test_profile(3, Gender::Female, "Lyon", &["tennis"]);
        let empty = create_test_profile(4, Gender::Female, "Lyon", &[]);

        assert!(shares_interest(&subject, &hit));
        assert!(!shares_interest(&subject, &miss));
        assert!(!shares_interest(&subject, &empty));
    }

    #[test]
    fn test_city_is_case_sensitive() {
        let subject = create_test_profile(1, Gender::Male, "Paris", &[]);
        let same = create_test_profile(2, Gender::Female, "Paris", &[]);
        let lower = create_test_profile(3, Gender::Female, "paris", &[]);

        assert!(same_city(&subject, &same));
        assert!(!same_city(&subject, &lower));
    }

    #[test]
    fn test_match_predicate() {
        let subject = create_test_profile(1, Gender::Male, "Paris", &["chess"]);

        assert!(is_match(&subject, &create_test_profile(2, Gender::Female, "Paris", &[])));
        assert!(is_match(&subject, &create_test_profile(3, Gender::Female, "Lyon", &["chess"])));
        assert!(!is_match(&subject, &create_test_profile(4, Gender::Female, "Lyon", &["golf"])));
        assert!(!is_match(&subject, &create_test_profile(5, Gender::Male, "Paris", &["chess"])));
    }
}
