//! Duplicate matching: "any single identifying field matches" wins.
//!
//! Comparison is exact, case-sensitive string equality on fields present
//! on both sides. No trimming, normalisation, or fuzzy matching.

use super::{Customer, HasIdentifiers, IdentifyingField, MatchDetails, MatchResult};

/// Compare a candidate against one stored record.
pub fn match_against<C, R>(candidate: &C, record: &R) -> MatchDetails
where
    C: HasIdentifiers + ?Sized,
    R: HasIdentifiers + ?Sized,
{
    let mut details = MatchDetails::default();
    for field in IdentifyingField::ALL {
        if let (Some(ours), Some(theirs)) = (candidate.identifier(field), record.identifier(field)) {
            if ours == theirs {
                details.set(field);
            }
        }
    }
    details
}

/// Scan `existing` in order and report the first record sharing any
/// identifying field with `candidate`.
///
/// The scan stops at the first hit, so later records that would also
/// collide are not reported.
pub fn check_duplicate<'a, C, I>(candidate: &C, existing: I) -> MatchResult
where
    C: HasIdentifiers + ?Sized,
    I: IntoIterator<Item = &'a Customer>,
{
    existing
        .into_iter()
        .find_map(|record| {
            let details = match_against(candidate, record);
            details
                .any()
                .then(|| MatchResult::found(record.clone(), details))
        })
        .unwrap_or_else(MatchResult::no_match)
}
