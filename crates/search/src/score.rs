use crate::SearchCandidate;

/// Added when a token is exactly the candidate's name.
pub const NAME_MATCH_WEIGHT: u64 = 16;
/// Multiplier for each occurrence of a token inside the candidate's name.
pub const CONTAINS_NAME_MULTIPLIER: u64 = 4;
/// Multiplier for each occurrence of a token inside the candidate's summary.
pub const SUMMARY_MULTIPLIER: u64 = 2;

/// Non-overlapping, literal occurrences of `needle` in `haystack`.
fn occurrences(haystack: &str, needle: &str) -> u64 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as u64
}

/// Scores one candidate against a list of (already lower-cased) tokens.
pub(crate) fn score(tokens: &[String], candidate: &SearchCandidate) -> u64 {
    let name = candidate.name.to_lowercase();
    let summary = candidate.summary.as_deref().map(str::to_lowercase);
    tokens
        .iter()
        .map(|token| {
            let name_score = if *token == name {
                NAME_MATCH_WEIGHT
            } else {
                CONTAINS_NAME_MULTIPLIER * occurrences(&name, token)
            };
            let summary_score = summary
                .as_deref()
                .map(|summary| SUMMARY_MULTIPLIER * occurrences(summary, token))
                .unwrap_or(0);
            name_score + summary_score
        })
        .sum()
}
