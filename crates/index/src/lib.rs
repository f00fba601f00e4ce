//! Clients for the Python Package Index.
//!
//! The [`PackageIndex`] trait is the only thing the command-line needs to
//! know about an index: fetch a package document, and run a name search.
//! [`HttpIndex`] talks to a real index (JSON API plus the XML-RPC `search`
//! method); `MockIndex` (behind the `mock` feature) serves canned data.

pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod models;
mod package;
mod xmlrpc;

pub use crate::http::HttpIndex;
#[cfg(feature = "mock")]
pub use crate::mock::MockIndex;
pub use crate::models::{DownloadWindows, Info, PackageData, ReleaseFile};
pub use crate::package::PackageRef;
pub use pypi_search::SearchCandidate;

use crate::error::Result;
use async_trait::async_trait;

/// Read-only view of a package index.
///
/// ```
/// use pypi_index::{PackageIndex, PackageRef, error::Result};
///
/// async fn latest_version(index: &dyn PackageIndex, name: &str) -> Result<String> {
///     let package = index.package(&PackageRef::new(name)).await?;
///     Ok(package.info.version)
/// }
/// ```
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Base URL of the index's package API (no trailing slash).
    fn url(&self) -> &str;

    /// Fetches the document for a package, or one version of it.
    ///
    /// # Errors
    /// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the index
    /// has no such package. Lookups are case-sensitive.
    async fn package(&self, package: &PackageRef) -> Result<PackageData>;

    /// Searches package names for all of `tokens`, in the index's own order.
    async fn search(&self, tokens: &[String]) -> Result<Vec<SearchCandidate>>;
}
