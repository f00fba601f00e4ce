use std::collections::HashSet;
use std::sync::LazyLock;

/// Common English function words that carry no weight in a search.
pub const STOP_WORDS: [&str; 31] = [
    "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it", "no", "not", "of", "on",
    "or", "such", "that", "the", "their", "then", "there", "these", "they", "this", "to", "was", "will",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> = LazyLock::new(|| STOP_WORDS.into_iter().collect());

/// A tokenized search query.
///
/// Tokens are lower-cased, split on whitespace, and stripped of stop words.
/// The same token list is used both to filter candidates at the index and
/// to score them locally.
///
/// ```rust
/// use pypi_search::Query;
///
/// let query = Query::parse("The Requests  OAuth");
/// assert_eq!(query.tokens(), ["requests", "oauth"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<String>,
}
impl Query {
    pub fn parse(query: &str) -> Self {
        let tokens = query
            .to_lowercase()
            .split_whitespace()
            .filter(|token| !STOP_WORD_SET.contains(token))
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
