use crate::core::filters::is_match;
use crate::models::{Profile, ProfileRecord};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Profile>,
    pub total_candidates: usize,
    /// Candidates dropped because their stored record could not be decoded
    pub skipped: usize,
}

/// Match finder
///
/// # Pipeline Stages
/// 1. Decode each candidate record (undecodable rows are skipped, not fatal)
/// 2. Self exclusion
/// 3. Match predicate: opposite gender AND (shared interest OR same city)
///
/// Output keeps the order the candidates were supplied in.
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Find matches for `subject` among the stored `candidates`
    ///
    /// Matched profiles carry their normalized interest set, not the raw
    /// stored string.
    pub fn find_matches(&self, subject: &Profile, candidates: Vec<ProfileRecord>) -> MatchResult {
        let total_candidates = candidates.len();
        let mut skipped = 0;

        let matches: Vec<Profile> = candidates
            .into_iter()
            // Stage 1: decode
            .filter_map(|record| match Profile::try_from(record) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping candidate for subject {}: {}", subject.id, e);
                    skipped += 1;
                    None
                }
            })
            // Stage 2: never match yourself
            .filter(|candidate| candidate.id != subject.id)
            // Stage 3: predicate
            .filter(|candidate| is_match(subject, candidate))
            .collect();

        MatchResult {
            matches,
            total_candidates,
            skipped,
        }
    }
}
