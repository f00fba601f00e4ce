use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// The pypi CLI.
///
/// Examples:
///
///     pypi stat Django
///     pypi browse Flask
///
/// To get help with a subcommand, add the --help option after the command.
#[derive(Debug, Parser)]
#[command(name = "pypi", version, disable_version_flag = true, verbatim_doc_comment)]
pub(crate) struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "PYPI_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debugging information to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Print download statistics for a package.
    ///
    /// Example:
    ///
    ///     pypi stat requests
    #[command(verbatim_doc_comment)]
    Stat(StatArgs),
    /// Get info about a package or packages.
    Info(InfoArgs),
    /// Search for a pypi package.
    ///
    /// Examples:
    ///
    ///     pypi search requests
    ///     pypi search 'requests oauth'
    ///     pypi search requests -n 20
    ///     pypi search 'requests toolbelt' --web
    #[command(verbatim_doc_comment)]
    Search(SearchArgs),
    /// Browse to a package's PyPI or project homepage.
    Browse(BrowseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StatArgs {
    /// Package names or index URLs
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Output a graph of download counts (default)
    #[arg(short = 'g', long = "graph", overrides_with = "no_graph")]
    graph: bool,

    /// Do not output a graph of download counts
    #[arg(short = 'q', long = "no-graph", overrides_with = "graph")]
    no_graph: bool,
}
impl StatArgs {
    pub fn graph(&self) -> bool {
        self.graph || !self.no_graph
    }
}

#[derive(Debug, Args)]
pub(crate) struct InfoArgs {
    /// Package names or index URLs
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Show license (default)
    #[arg(long = "license", overrides_with = "no_license")]
    license: bool,

    /// Do not show license
    #[arg(long = "no-license", overrides_with = "license")]
    no_license: bool,

    /// Show classifiers
    #[arg(short = 'c', long)]
    pub classifiers: bool,

    /// Show long description
    #[arg(short = 'L', long)]
    pub long_description: bool,
}
impl InfoArgs {
    pub fn license(&self) -> bool {
        self.license || !self.no_license
    }
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    pub query: String,

    /// Max number of results to show; 0 shows all of them
    #[arg(short = 'n', long = "n-results", value_name = "N")]
    pub n_results: Option<usize>,

    /// Open search results in your web browser
    #[arg(short = 'w', long)]
    pub web: bool,
}

#[derive(Debug, Args)]
pub(crate) struct BrowseArgs {
    /// Package name or index URL
    pub package: String,

    /// Open the project's home page instead of its index page
    #[arg(long)]
    pub homepage: bool,
}
