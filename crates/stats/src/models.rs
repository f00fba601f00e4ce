use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::format_description::{BorrowedFormatItem, OwnedFormatItem};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Timestamp layout used by the index's `upload_time` field.
const UPLOAD_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
/// `yy/mm/dd`
pub const DEFAULT_DATE_FORMAT: &str = "[year repr:last_two]/[month]/[day]";

/// Parses an upload timestamp, either naive (`2014-02-08T21:30:37`) or
/// RFC 3339 (`2014-02-08T21:30:37.123456Z`). Offsets are normalised to UTC.
pub fn parse_upload_time(value: &str) -> Result<PrimitiveDateTime> {
    if let Ok(with_offset) = OffsetDateTime::parse(value, &Rfc3339) {
        let utc = with_offset.to_offset(UtcOffset::UTC);
        return Ok(PrimitiveDateTime::new(utc.date(), utc.time()));
    }
    PrimitiveDateTime::parse(value, UPLOAD_TIME).or_raise(|| ErrorKind::InvalidTimestamp(value.to_string()))
}

/// One uploaded file (sdist, wheel, ...) belonging to a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub downloads: u64,
    pub uploaded: PrimitiveDateTime,
}
impl FileEntry {
    pub fn new(downloads: u64, uploaded: PrimitiveDateTime) -> Self {
        Self { downloads, uploaded }
    }

    /// Builds an entry from the raw timestamp string reported by the index.
    pub fn parse(downloads: u64, upload_time: &str) -> Result<Self> {
        Ok(Self::new(downloads, parse_upload_time(upload_time)?))
    }
}

/// A published version and the files uploaded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub version: String,
    pub files: Vec<FileEntry>,
}
impl ReleaseRecord {
    pub fn new(version: impl Into<String>, files: Vec<FileEntry>) -> Self {
        Self { version: version.into(), files }
    }
}
impl<V: Into<String>> From<(V, Vec<FileEntry>)> for ReleaseRecord {
    fn from((version, files): (V, Vec<FileEntry>)) -> Self {
        Self::new(version, files)
    }
}

/// Download total for a single version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStat {
    pub version: String,
    /// Sum of the download counts of every file in the release.
    pub downloads: u64,
    /// Earliest upload among the release's files.
    pub first_upload: PrimitiveDateTime,
}
impl VersionStat {
    /// Returns `None` for releases without files; they carry no statistics.
    pub(crate) fn from_release(release: ReleaseRecord) -> Option<Self> {
        let first_upload = release.files.iter().map(|f| f.uploaded).min()?;
        let downloads = release.files.iter().map(|f| f.downloads).sum();
        Some(Self {
            version: release.version,
            downloads,
            first_upload,
        })
    }
}

/// A parsed `time` format description for chart dates.
#[derive(Clone)]
pub struct DateFormat {
    source: String,
    format: OwnedFormatItem,
}
impl DateFormat {
    pub fn format(&self, datetime: PrimitiveDateTime) -> Result<String> {
        datetime.format(&self.format).or_raise(|| ErrorKind::Format)
    }
}
impl FromStr for DateFormat {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        let format = time::format_description::parse_owned::<2>(s).or_raise(|| ErrorKind::InvalidDateFormat(s.to_string()))?;
        Ok(Self { source: s.to_string(), format })
    }
}
impl Default for DateFormat {
    fn default() -> Self {
        Self {
            source: DEFAULT_DATE_FORMAT.to_string(),
            format: OwnedFormatItem::from(format_description!("[year repr:last_two]/[month]/[day]")),
        }
    }
}
impl Debug for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("DateFormat").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[rstest]
    #[case("2014-02-08T21:30:37", datetime!(2014-02-08 21:30:37))]
    #[case("2014-02-08T21:30:37.5", datetime!(2014-02-08 21:30:37.5))]
    #[case("2014-02-08T21:30:37.123456Z", datetime!(2014-02-08 21:30:37.123456))]
    #[case("2014-02-08T23:30:37+02:00", datetime!(2014-02-08 21:30:37))]
    fn test_parse_upload_time(#[case] input: &str, #[case] expected: PrimitiveDateTime) {
        assert_eq!(parse_upload_time(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2014-02-08")]
    #[case("2014-13-08T21:30:37")]
    fn test_parse_upload_time_invalid(#[case] input: &str) {
        let err = parse_upload_time(input).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidTimestamp(input.to_string()));
    }

    #[test]
    fn release_without_files_has_no_stat() {
        assert_eq!(VersionStat::from_release(ReleaseRecord::new("1.0", vec![])), None);
    }

    #[test]
    fn version_stat_sums_files_and_takes_earliest_upload() {
        let release = ReleaseRecord::new(
            "1.0",
            vec![
                FileEntry::new(5, datetime!(2020-01-02 00:00)),
                FileEntry::new(7, datetime!(2020-01-01 12:00)),
            ],
        );
        let stat = VersionStat::from_release(release).unwrap();
        assert_eq!(stat.downloads, 12);
        assert_eq!(stat.first_upload, datetime!(2020-01-01 12:00));
    }

    #[rstest]
    #[case(DateFormat::default(), "14/02/08")]
    #[case("[year]-[month]-[day]".parse().unwrap(), "2014-02-08")]
    #[case("[day].[month].[year] [hour]:[minute]".parse().unwrap(), "08.02.2014 21:30")]
    fn test_date_format(#[case] format: DateFormat, #[case] expected: &str) {
        assert_eq!(format.format(datetime!(2014-02-08 21:30:37)).unwrap(), expected);
    }

    #[test]
    fn invalid_date_format() {
        assert!("[year".parse::<DateFormat>().is_err());
        assert!("[not-a-component]".parse::<DateFormat>().is_err());
    }
}
