//! Relevance ranking for package search results.
//!
//! The index returns candidates in no particular order (and often with the
//! same package listed once per release). [`rank`] deduplicates them by name,
//! scores each against the query tokens and returns them best-first:
//!
//! - a token equal to the package name scores [`NAME_MATCH_WEIGHT`],
//! - otherwise each occurrence of the token in the name scores
//!   [`CONTAINS_NAME_MULTIPLIER`],
//! - each occurrence of the token in the summary scores
//!   [`SUMMARY_MULTIPLIER`].
//!
//! Tokens are matched as literal substrings.

mod query;
mod score;

use std::collections::HashSet;
use tracing::instrument;

pub use crate::query::{Query, STOP_WORDS};
pub use crate::score::{CONTAINS_NAME_MULTIPLIER, NAME_MATCH_WEIGHT, SUMMARY_MULTIPLIER};

/// A single search result as returned by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub name: String,
    pub summary: Option<String>,
}
impl SearchCandidate {
    pub fn new(name: impl Into<String>, summary: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            summary: summary.map(Into::into),
        }
    }
}

/// A candidate paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub score: u64,
    pub candidate: SearchCandidate,
}

impl Query {
    /// Deduplicates, scores and sorts `candidates`, best match first.
    ///
    /// Only the first candidate with any given name is kept. Candidates with
    /// equal scores keep their input order.
    #[instrument(level = "debug", skip(candidates), fields(tokens = ?self.tokens()))]
    pub fn score_all(&self, candidates: impl IntoIterator<Item = SearchCandidate>) -> Vec<Scored> {
        let mut seen = HashSet::new();
        let mut scored: Vec<Scored> = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.name.clone()))
            .map(|candidate| Scored {
                score: score::score(self.tokens(), &candidate),
                candidate,
            })
            .collect();
        // `sort_by` is stable; ties stay in input order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        tracing::debug!(unique = scored.len(), "Ranked search candidates");
        scored
    }

    pub fn rank(&self, candidates: impl IntoIterator<Item = SearchCandidate>, limit: Option<usize>) -> Vec<SearchCandidate> {
        let scored = self.score_all(candidates).into_iter().map(|s| s.candidate);
        match limit {
            Some(limit) => scored.take(limit).collect(),
            None => scored.collect(),
        }
    }
}

/// Ranks `candidates` against a free-text `query`, returning at most `limit`
/// results when a limit is given.
///
/// ```rust
/// use pypi_search::{SearchCandidate, rank};
///
/// let candidates = vec![
///     SearchCandidate::new("flask-restful", Some("flask REST extension")),
///     SearchCandidate::new("flask", None::<String>),
/// ];
/// let ranked = rank("flask", candidates, None);
/// assert_eq!(ranked[0].name, "flask");
/// ```
pub fn rank(query: &str, candidates: impl IntoIterator<Item = SearchCandidate>, limit: Option<usize>) -> Vec<SearchCandidate> {
    Query::parse(query).rank(candidates, limit)
}
