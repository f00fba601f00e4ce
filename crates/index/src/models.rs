//! Package documents returned by the index's JSON API.
//!
//! Only the fields the CLI displays are modelled. The modern index reports
//! `-1` for every (retired) download counter and `""` for unset metadata;
//! both are normalised here (to `0` and `None`) so callers never see them.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use pypi_stats::{FileEntry, ReleaseRecord};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt::{Formatter, Result as FmtResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageData {
    pub info: Info,
    /// Version to uploaded files, in document order.
    #[serde(default, deserialize_with = "ordered_releases")]
    pub releases: Vec<(String, Vec<ReleaseFile>)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Info {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub author_email: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub maintainer: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub maintainer_email: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub license: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub home_page: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub docs_url: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub package_url: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
    #[serde(default)]
    pub downloads: DownloadWindows,
}

/// Downloads over the trailing day, week and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadWindows {
    #[serde(default, deserialize_with = "non_negative")]
    pub last_day: u64,
    #[serde(default, deserialize_with = "non_negative")]
    pub last_week: u64,
    #[serde(default, deserialize_with = "non_negative")]
    pub last_month: u64,
}

/// A single distribution file uploaded for a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default, deserialize_with = "non_negative")]
    pub downloads: u64,
    pub upload_time: String,
}

impl PackageData {
    /// Files uploaded for `version`.
    ///
    /// # Errors
    /// [`ErrorKind::NotFound`] if the release listing has no such version.
    pub fn release(&self, version: &str) -> Result<&[ReleaseFile]> {
        self.releases
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, files)| files.as_slice())
            .ok_or_raise(|| ErrorKind::NotFound(format!("{}/{version}", self.info.name)))
    }

    /// Converts the raw release listing into records for aggregation.
    ///
    /// # Errors
    /// [`ErrorKind::InvalidData`] if any upload timestamp is unparseable.
    pub fn release_records(&self) -> Result<Vec<ReleaseRecord>> {
        self.releases
            .iter()
            .map(|(version, files)| {
                let files = files
                    .iter()
                    .map(|file| FileEntry::parse(file.downloads, &file.upload_time))
                    .collect::<pypi_stats::error::Result<Vec<_>>>()
                    .or_raise(|| ErrorKind::InvalidData)?;
                Ok(ReleaseRecord::new(version.as_str(), files))
            })
            .collect()
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty() && s.trim() != "UNKNOWN"))
}

fn non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let value = Option::<i64>::deserialize(deserializer)?;
    Ok(value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0))
}

fn ordered_releases<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<(String, Vec<ReleaseFile>)>, D::Error> {
    struct ReleasesVisitor;
    impl<'de> Visitor<'de> for ReleasesVisitor {
        type Value = Vec<(String, Vec<ReleaseFile>)>;

        fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
            f.write_str("a map of versions to release files")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut releases = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((version, files)) = map.next_entry::<String, Vec<ReleaseFile>>()? {
                releases.push((version, files));
            }
            Ok(releases)
        }
    }
    deserializer.deserialize_map(ReleasesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pypi_stats::summarize;

    const WEBARGS: &str = include_str!("../fixtures/webargs.json");

    #[test]
    fn parses_fixture() {
        let data: PackageData = serde_json::from_str(WEBARGS).unwrap();
        assert_eq!(data.info.name, "webargs");
        assert_eq!(data.info.version, "0.4.0");
        assert_eq!(data.info.author.as_deref(), Some("Steven Loria"));
        assert_eq!(data.info.maintainer, None);
        assert_eq!(data.info.docs_url, None);
        assert_eq!(data.info.downloads, DownloadWindows { last_day: 12, last_week: 159, last_month: 741 });
        assert_eq!(data.info.classifiers.len(), 3);
    }

    #[test]
    fn releases_keep_document_order() {
        let data: PackageData = serde_json::from_str(WEBARGS).unwrap();
        let versions: Vec<_> = data.releases.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(versions, ["0.1.0", "0.3.0", "0.2.0", "0.3.1", "0.3.2", "0.3.3", "0.3.4", "0.4.0", "0.5.0.dev"]);
    }

    #[test]
    fn release_records_feed_statistics() {
        let data: PackageData = serde_json::from_str(WEBARGS).unwrap();
        let stats = summarize(data.release_records().unwrap());
        assert_eq!(
            stats.version_names(),
            ["0.1.0", "0.2.0", "0.3.0", "0.3.1", "0.3.2", "0.3.3", "0.3.4", "0.4.0"]
        );
        assert_eq!(stats.total(), 1_580);
        assert_eq!(stats.max(), (Some("0.1.0"), 420));
        assert_eq!(stats.min(), (Some("0.4.0"), 35));
        assert_eq!(stats.average(), 197);
    }

    #[test]
    fn modern_placeholders_are_normalised() {
        let data: PackageData = serde_json::from_str(
            r#"{
                "info": {
                    "name": "modern",
                    "version": "1.0",
                    "summary": "",
                    "license": "UNKNOWN",
                    "home_page": null,
                    "downloads": {"last_day": -1, "last_week": -1, "last_month": -1}
                },
                "releases": {
                    "1.0": [{"filename": "modern-1.0.tar.gz", "downloads": -1, "upload_time": "2024-01-01T00:00:00"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(data.info.summary, None);
        assert_eq!(data.info.license, None);
        assert_eq!(data.info.home_page, None);
        assert_eq!(data.info.downloads, DownloadWindows::default());
        assert_eq!(data.releases[0].1[0].downloads, 0);
    }

    #[test]
    fn release_lookup_by_version() {
        let data: PackageData = serde_json::from_str(WEBARGS).unwrap();
        assert_eq!(data.release("0.1.0").unwrap().len(), 2);
        assert!(data.release("0.5.0.dev").unwrap().is_empty());
        let err = data.release("9.9.9").unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("webargs/9.9.9".to_string()));
    }

    #[test]
    fn missing_releases_default_to_empty() {
        let data: PackageData = serde_json::from_str(r#"{"info": {"name": "foo"}}"#).unwrap();
        assert!(data.releases.is_empty());
        assert!(data.release_records().unwrap().is_empty());
    }

    #[test]
    fn invalid_upload_time_is_invalid_data() {
        let data: PackageData = serde_json::from_str(
            r#"{"info": {"name": "foo"}, "releases": {"1.0": [{"downloads": 1, "upload_time": "whenever"}]}}"#,
        )
        .unwrap();
        let err = data.release_records().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData);
    }
}
