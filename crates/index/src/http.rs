//! HTTP client for a live package index.

use crate::error::{ErrorKind, Result};
use crate::models::PackageData;
use crate::package::PackageRef;
use crate::xmlrpc;
use crate::PackageIndex;
use async_trait::async_trait;
use exn::ResultExt;
use pypi_search::SearchCandidate;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::instrument;

/// Package index reachable over HTTP.
///
/// Package documents are fetched from `{url}/{name}/json`; searches are
/// posted as XML-RPC calls to the separate `search_url`.
#[derive(Debug, Clone)]
pub struct HttpIndex {
    client: Client,
    url: String,
    search_url: String,
}

impl HttpIndex {
    pub fn new(client: Client, url: impl Into<String>, search_url: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self {
            client,
            url,
            search_url: search_url.into(),
        }
    }

    /// Builds an HTTP client suitable for talking to an index.
    pub fn client(user_agent: &str, timeout: Duration) -> Result<Client> {
        Client::builder().user_agent(user_agent).timeout(timeout).build().or_raise(|| ErrorKind::Network)
    }
}

#[async_trait]
impl PackageIndex for HttpIndex {
    fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self, package), fields(package = %package))]
    async fn package(&self, package: &PackageRef) -> Result<PackageData> {
        let url = package.json_url(&self.url);
        tracing::debug!(%url, "Fetching package document");
        let response = self.client.get(&url).send().await.or_raise(|| ErrorKind::Network)?;
        match response.status() {
            StatusCode::NOT_FOUND => exn::bail!(ErrorKind::NotFound(package.to_string())),
            status if !status.is_success() => exn::bail!(ErrorKind::Status(status.as_u16())),
            _ => {},
        }
        // Read the body first so transport failures are not reported as bad data.
        let body = response.bytes().await.or_raise(|| ErrorKind::Network)?;
        serde_json::from_slice(&body).or_raise(|| ErrorKind::InvalidData)
    }

    #[instrument(skip(self))]
    async fn search(&self, tokens: &[String]) -> Result<Vec<SearchCandidate>> {
        let response = self
            .client
            .post(&self.search_url)
            .header(CONTENT_TYPE, "text/xml")
            .body(xmlrpc::encode_search(tokens))
            .send()
            .await
            .or_raise(|| ErrorKind::Network)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response.text().await.or_raise(|| ErrorKind::Network)?;
        let candidates = xmlrpc::decode_search(&body)?;
        tracing::debug!(results = candidates.len(), "Search completed");
        Ok(candidates)
    }
}
