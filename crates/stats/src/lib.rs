//! Download statistics for a single package.
//!
//! [`summarize`] turns the raw release listing of a package into a
//! [`PackageStats`] value: versions ordered by their first upload, the
//! download count of each, and the total, minimum, maximum and average over
//! all versions. Everything is computed once, up front; [`PackageStats`] is a
//! plain immutable snapshot.
//!
//! Releases without any uploaded files are ignored entirely.

pub mod error;
mod models;

use pypi_chart::{BarChart, ChartEntry};
use tracing::instrument;

use crate::error::Result;
pub use crate::models::{
    DEFAULT_DATE_FORMAT, DateFormat, FileEntry, ReleaseRecord, VersionStat, parse_upload_time,
};

/// Width the version is padded to in chart labels.
pub const DEFAULT_VERSION_WIDTH: usize = 20;

/// Aggregated download statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStats {
    versions: Vec<VersionStat>,
    total: u64,
    min: Option<usize>,
    max: Option<usize>,
}

/// Computes download statistics from a package's releases.
///
/// ```rust
/// use pypi_stats::{FileEntry, summarize};
///
/// let stats = summarize([
///     ("0.1.0", vec![FileEntry::parse(10, "2014-01-01T00:00:00").unwrap()]),
///     ("0.2.0", vec![FileEntry::parse(30, "2014-02-01T00:00:00").unwrap()]),
/// ]);
/// assert_eq!(stats.total(), 40);
/// assert_eq!(stats.max(), (Some("0.2.0"), 30));
/// ```
#[instrument(level = "debug", skip(releases))]
pub fn summarize<R: Into<ReleaseRecord>>(releases: impl IntoIterator<Item = R>) -> PackageStats {
    let mut versions: Vec<VersionStat> =
        releases.into_iter().filter_map(|release| VersionStat::from_release(release.into())).collect();
    // Stable: versions uploaded at the same instant keep their listing order.
    versions.sort_by_key(|v| v.first_upload);

    let total = versions.iter().map(|v| v.downloads).sum();
    let mut min: Option<usize> = None;
    let mut max: Option<usize> = None;
    for (index, version) in versions.iter().enumerate() {
        // Strict comparisons: the first extremal version wins.
        if min.is_none_or(|m| version.downloads < versions[m].downloads) {
            min = Some(index);
        }
        if max.is_none_or(|m| version.downloads > versions[m].downloads) {
            max = Some(index);
        }
    }
    tracing::debug!(versions = versions.len(), total, "Summarized package releases");
    PackageStats { versions, total, min, max }
}

impl PackageStats {
    /// Versions with at least one file, oldest first.
    pub fn versions(&self) -> &[VersionStat] {
        &self.versions
    }

    /// Version strings, oldest first.
    pub fn version_names(&self) -> Vec<&str> {
        self.versions.iter().map(|v| v.version.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Version with the fewest downloads, or `(None, 0)` without releases.
    pub fn min(&self) -> (Option<&str>, u64) {
        self.extreme(self.min)
    }

    /// Version with the most downloads, or `(None, 0)` without releases.
    pub fn max(&self) -> (Option<&str>, u64) {
        self.extreme(self.max)
    }

    /// Integer-truncated mean downloads per version; `0` without releases.
    pub fn average(&self) -> u64 {
        match self.versions.len() as u64 {
            0 => 0,
            count => self.total / count,
        }
    }

    fn extreme(&self, index: Option<usize>) -> (Option<&str>, u64) {
        match index.map(|i| &self.versions[i]) {
            Some(stat) => (Some(stat.version.as_str()), stat.downloads),
            None => (None, 0),
        }
    }

    /// Chart entries labelled with the version and its first upload date.
    pub fn chart_entries(&self, version_width: usize, date_format: &DateFormat) -> Result<Vec<ChartEntry>> {
        self.versions
            .iter()
            .map(|stat| {
                let date = date_format.format(stat.first_upload)?;
                let label = format!("{:version_width$} {date}", stat.version);
                Ok(ChartEntry::new(label, stat.downloads))
            })
            .collect()
    }

    /// Renders the per-version downloads with the given chart settings.
    #[instrument(level = "debug", skip_all)]
    pub fn render_chart(&self, chart: &BarChart, version_width: usize, date_format: &DateFormat) -> Result<String> {
        Ok(chart.render(&self.chart_entries(version_width, date_format)?))
    }
}
