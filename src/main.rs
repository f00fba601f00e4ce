//! A command line interface to the Python Package Index.
//!
//! ```bash
//! pypi stat Django
//! pypi info -c flask
//! pypi search 'requests oauth' -n 20
//! pypi browse --homepage Flask
//! ```

mod browser;
mod cli;
mod commands;
mod error;
mod output;

use crate::browser::SystemBrowser;
use crate::cli::Cli;
use crate::commands::Context;
use crate::error::{Error, ErrorKind, Result};
use clap::Parser;
use console::style;
use exn::ResultExt;
use pypi_config::Config;
use pypi_index::HttpIndex;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PYPI_LOG=pypi_index=trace`.
const LOG_ENV: &str = "PYPI_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, cli.debug);
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let client =
        HttpIndex::client(&config.index.user_agent, config.index.request_timeout()).or_raise(|| ErrorKind::Index)?;
    let index = HttpIndex::new(client, &config.index.url, &config.index.search_url);
    let ctx = Context {
        index: &index,
        config: &config,
        width: output::terminal_width(),
        launcher: &SystemBrowser,
    };
    commands::execute(&cli.command, &ctx).await
}

fn report(err: &Error, debug: bool) {
    eprintln!("{} {}", style("Error:").red().bold(), **err);
    if debug {
        eprintln!("{err:?}");
        return;
    }
    if err.is_retryable() {
        eprintln!("This may be temporary; try again shortly.");
    }
    eprintln!("Run again with --debug for details.");
}
