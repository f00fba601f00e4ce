//! Layered configuration for the `pypi` command-line.
//!
//! Values are merged, last one wins, from:
//!
//! 1. built-in defaults,
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension); either
//!    the one passed explicitly or `config.toml` in the platform config
//!    directory,
//! 3. environment variables prefixed with `PYPI_`, using `__` to separate
//!    nested keys (`PYPI_SEARCH__RESULTS=20`).
//!
//! Everything is validated once, after merging.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use pypi_chart::{BarChart, DEFAULT_MARGIN, DEFAULT_MAX_LABEL_WIDTH, DEFAULT_TICK};
use pypi_stats::{DEFAULT_DATE_FORMAT, DEFAULT_VERSION_WIDTH, DateFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

pub const ENV_PREFIX: &str = "PYPI_";
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";
pub const DEFAULT_WEB_SEARCH_URL: &str = "https://pypi.org/search/?q={query}";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SEARCH_RESULTS: usize = 100;
pub const DEFAULT_NAME_WIDTH: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub chart: ChartConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Base URL of the JSON API.
    pub url: String,
    /// XML-RPC endpoint used for searches.
    pub search_url: String,
    /// Web search page; `{query}` is replaced by the percent-encoded query.
    pub web_search: String,
    /// Request timeout, in seconds.
    pub timeout: u64,
    pub user_agent: String,
}
impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEX_URL.to_string(),
            search_url: DEFAULT_INDEX_URL.to_string(),
            web_search: DEFAULT_WEB_SEARCH_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("pypi-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
impl IndexConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// The web search page for `encoded_query`.
    pub fn web_search_url(&self, encoded_query: &str) -> String {
        self.web_search.replace("{query}", encoded_query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub tick: char,
    /// Columns left free at the right edge of the terminal.
    pub margin: usize,
    pub max_label_width: usize,
    pub version_width: usize,
    /// A `time` format description, e.g. `[year]-[month]-[day]`.
    pub date_format: String,
}
impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            margin: DEFAULT_MARGIN,
            max_label_width: DEFAULT_MAX_LABEL_WIDTH,
            version_width: DEFAULT_VERSION_WIDTH,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
impl ChartConfig {
    pub fn date_format(&self) -> Result<DateFormat> {
        self.date_format.parse::<DateFormat>().or_raise(|| ErrorKind::Invalid("chart.date_format".to_string()))
    }

    /// A chart for a terminal `display_width` columns wide.
    pub fn bar_chart(&self, display_width: usize) -> BarChart {
        BarChart::new(display_width)
            .with_margin(self.margin)
            .with_max_label_width(self.max_label_width)
            .with_tick(self.tick)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default number of results; `0` shows all of them.
    pub results: usize,
    /// Width of the name column in search results.
    pub name_width: usize,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results: DEFAULT_SEARCH_RESULTS,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }
}

impl Config {
    /// Location of the configuration file used when none is given.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "pypi", "pypi-cli").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from defaults, `path` (or the default file, if
    /// it exists) and the environment.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    /// Assembles every configuration source without extracting.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) => {
                if !path.is_file() {
                    let err = exn::Exn::from(ErrorKind::Invalid(format!("config file {}", path.display())));
                    return Err(err.raise(ErrorKind::Load));
                }
                figment = Self::merge_file(figment, path)?;
            },
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    figment = Self::merge_file(figment, &path)?;
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        tracing::debug!(path = %path.display(), "Reading configuration file");
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::Invalid(format!("unsupported config file extension: {}", path.display()))),
        })
    }

    /// Extracts and validates configuration from an assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, url) in [("index.url", &self.index.url), ("index.search_url", &self.index.search_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                exn::bail!(ErrorKind::Invalid(field.to_string()));
            }
        }
        if !self.index.web_search.contains("{query}") {
            exn::bail!(ErrorKind::Invalid("index.web_search".to_string()));
        }
        if self.index.timeout == 0 {
            exn::bail!(ErrorKind::Invalid("index.timeout".to_string()));
        }
        if self.chart.tick.is_control() || self.chart.tick.is_whitespace() {
            exn::bail!(ErrorKind::Invalid("chart.tick".to_string()));
        }
        self.chart.date_format()?;
        Ok(())
    }
}
