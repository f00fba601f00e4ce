//! In-memory package index for testing.

use crate::error::{ErrorKind, Result};
use crate::models::PackageData;
use crate::package::PackageRef;
use crate::PackageIndex;
use async_trait::async_trait;
use pypi_search::SearchCandidate;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory package index for testing.
///
/// Packages are keyed by exact name (the index is case-sensitive). A
/// versioned lookup answers like the live per-version endpoint: the version
/// must exist, and the document carries no release listing. Every search
/// returns the same canned results and is recorded, so tests can assert on
/// the tokens that were sent.
///
/// # Examples
///
/// ```
/// use pypi_index::{MockIndex, PackageIndex, PackageRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = MockIndex::default().with_json(r#"{"info": {"name": "foo"}}"#);
/// let package = index.package(&PackageRef::new("foo")).await?;
/// assert_eq!(package.info.name, "foo");
/// assert!(index.package(&PackageRef::new("Foo")).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct MockIndex {
    url: String,
    packages: HashMap<String, PackageData>,
    results: Vec<SearchCandidate>,
    searches: Mutex<Vec<Vec<String>>>,
}

impl MockIndex {
    /// Adds a package, keyed by its `info.name`.
    pub fn with_package(mut self, package: PackageData) -> Self {
        self.packages.insert(package.info.name.clone(), package);
        self
    }

    /// Adds a package from its JSON document.
    ///
    /// Panics if the document does not parse.
    pub fn with_json(self, json: &str) -> Self {
        let package = match serde_json::from_str(json) {
            Ok(package) => package,
            // The panic here is DELIBERATE. MockIndex is intended to be used
            // in tests; a broken fixture should fail the test.
            Err(err) => panic!("MockIndex::with_json: invalid package document: {err}"),
        };
        self.with_package(package)
    }

    /// Sets the results returned by every search.
    pub fn with_search_results(mut self, results: impl IntoIterator<Item = SearchCandidate>) -> Self {
        self.results = results.into_iter().collect();
        self
    }

    /// Token lists of every search made so far.
    pub async fn searches(&self) -> Vec<Vec<String>> {
        self.searches.lock().await.clone()
    }
}
impl Default for MockIndex {
    fn default() -> Self {
        Self {
            url: "https://pypi.org/pypi".to_string(),
            packages: HashMap::new(),
            results: Vec::new(),
            searches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PackageIndex for MockIndex {
    fn url(&self) -> &str {
        &self.url
    }

    async fn package(&self, package: &PackageRef) -> Result<PackageData> {
        let data = self
            .packages
            .get(&package.name)
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(package.to_string())))?;
        let Some(version) = &package.version else {
            return Ok(data.clone());
        };
        data.release(version)?;
        Ok(PackageData {
            info: data.info.clone(),
            releases: Vec::new(),
        })
    }

    async fn search(&self, tokens: &[String]) -> Result<Vec<SearchCandidate>> {
        self.searches.lock().await.push(tokens.to_vec());
        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_package_is_not_found() {
        let index = MockIndex::default();
        let err = index.package(&PackageRef::new("missing")).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_versioned_lookup_has_no_release_listing() {
        let index = MockIndex::default().with_json(
            r#"{"info": {"name": "foo"}, "releases": {"1.0": [{"downloads": 1, "upload_time": "2020-01-01T00:00:00"}]}}"#,
        );
        let package = index.package(&PackageRef::parse("foo/1.0").unwrap()).await.unwrap();
        assert_eq!(package.info.name, "foo");
        assert!(package.releases.is_empty());

        let err = index.package(&PackageRef::parse("foo/2.0").unwrap()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("foo/2.0".to_string()));
    }

    #[tokio::test]
    async fn test_searches_are_recorded() {
        let index = MockIndex::default().with_search_results([SearchCandidate::new("flask", None::<String>)]);
        let results = index.search(&["flask".to_string()]).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(index.searches().await, vec![vec!["flask".to_string()]]);
    }

    #[test]
    #[should_panic(expected = "invalid package document")]
    fn test_with_json_panics_on_bad_fixture() {
        let _ = MockIndex::default().with_json("{}");
    }
}
