use crate::error::{Error, ErrorKind, Result};
use exn::OptionExt;
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

static PACKAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<index>https?://[^/]+/pypi)/)?(?P<name>[-A-Za-z0-9_.]+)(?:/(?P<version>[-A-Za-z0-9.]+))?$")
        .unwrap()
});

/// A package named on the command-line.
///
/// Either a bare name (`requests`), a name and version (`requests/2.0.0`),
/// or a full package URL on a specific index
/// (`https://pypi.org/pypi/requests`).
///
/// ```rust
/// use pypi_index::PackageRef;
///
/// let package: PackageRef = "https://test.pypi.org/pypi/webargs/0.4.0".parse().unwrap();
/// assert_eq!(package.index.as_deref(), Some("https://test.pypi.org/pypi"));
/// assert_eq!(package.name, "webargs");
/// assert_eq!(package.version.as_deref(), Some("0.4.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Index base URL, when the input named one explicitly.
    pub index: Option<String>,
    pub name: String,
    pub version: Option<String>,
}
impl PackageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            index: None,
            name: name.into(),
            version: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let captures =
            PACKAGE_REGEX.captures(input.trim()).ok_or_raise(|| ErrorKind::InvalidName(input.to_string()))?;
        Ok(Self {
            index: captures.name("index").map(|m| m.as_str().to_string()),
            name: captures["name"].to_string(),
            version: captures.name("version").map(|m| m.as_str().to_string()),
        })
    }

    /// The same package with any version dropped.
    pub fn without_version(&self) -> Self {
        Self {
            version: None,
            ..self.clone()
        }
    }

    /// The index this package lives on, falling back to `default_index`.
    pub fn index_url<'a>(&'a self, default_index: &'a str) -> &'a str {
        self.index.as_deref().unwrap_or(default_index).trim_end_matches('/')
    }

    /// URL of the JSON document describing this package (or version).
    pub fn json_url(&self, default_index: &str) -> String {
        let index = self.index_url(default_index);
        match &self.version {
            Some(version) => format!("{index}/{}/{version}/json", self.name),
            None => format!("{index}/{}/json", self.name),
        }
    }

    /// Human-facing page for this package on the index.
    pub fn page_url(&self, default_index: &str) -> String {
        format!("{}/{}", self.index_url(default_index), self.name)
    }
}
impl FromStr for PackageRef {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
impl Display for PackageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.version {
            Some(version) => write!(f, "{}/{version}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
