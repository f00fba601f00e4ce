//! Subcommand implementations.
//!
//! Every command writes to the `out`/`err` streams it is handed and reaches
//! the outside world only through [`Context`], so tests can drive them with a
//! mock index and in-memory buffers.

mod browse;
mod info;
mod search;
mod stat;

use crate::browser::Launcher;
use crate::cli::Command;
use crate::error::{Error, ErrorKind, Result};
use crate::output;
use pypi_config::Config;
use pypi_index::error::{Error as IndexError, ErrorKind as IndexErrorKind, Result as IndexResult};
use pypi_index::{PackageData, PackageIndex, PackageRef};
use std::io::Write;

/// Collaborators shared by every command.
pub(crate) struct Context<'a> {
    pub index: &'a dyn PackageIndex,
    pub config: &'a Config,
    /// Terminal width in columns.
    pub width: usize,
    pub launcher: &'a dyn Launcher,
}

pub(crate) async fn run(command: &Command, ctx: &Context<'_>, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    match command {
        Command::Stat(args) => stat::run(ctx, args, out, err).await,
        Command::Info(args) => info::run(ctx, args, out, err).await,
        Command::Search(args) => search::run(ctx, args, out).await,
        Command::Browse(args) => browse::run(ctx, args, out).await,
    }
}

/// Runs `command` against the real stdout and stderr.
///
/// Search results go through a pager when stdout is a terminal.
pub(crate) async fn execute(command: &Command, ctx: &Context<'_>) -> Result<()> {
    let mut err = std::io::stderr().lock();
    match command {
        Command::Search(args) if !args.web => {
            let mut buffer = Vec::new();
            run(command, ctx, &mut buffer, &mut err).await?;
            output::page(&String::from_utf8_lossy(&buffer))
        },
        _ => {
            let mut out = std::io::stdout().lock();
            run(command, ctx, &mut out, &mut err).await
        },
    }
}

/// Outcome of looking up a package named on the command-line.
enum Lookup {
    Found(PackageRef, Box<PackageData>),
    /// Already reported on stderr.
    Skipped,
}

/// Which document a lookup fetches.
#[derive(Debug, Clone, Copy)]
enum Document {
    /// The document exactly as named, version included.
    AsNamed,
    /// The whole-package document with every release; a named version must
    /// appear in its release listing.
    Package,
}

/// Fetches a package for a command that processes several in turn.
///
/// Invalid names, unknown packages and unknown versions are reported on
/// `err` and skipped; anything else aborts the command.
async fn lookup(ctx: &Context<'_>, input: &str, document: Document, err: &mut dyn Write) -> Result<Lookup> {
    let Ok(package) = PackageRef::parse(input) else {
        output::warn(err, format_args!("Invalid name or URL: \"{input}\""))?;
        return Ok(Lookup::Skipped);
    };
    match fetch(ctx, &package, document).await {
        Ok(data) => Ok(Lookup::Found(package, Box::new(data))),
        Err(e) if matches!(&*e, IndexErrorKind::NotFound(_)) => {
            tracing::debug!(package = %package, "Package not found");
            output::warn(err, format_args!("No versions found for \"{package}\". Skipping. . ."))?;
            Ok(Lookup::Skipped)
        },
        Err(e) => Err(index_error(e)),
    }
}

async fn fetch(ctx: &Context<'_>, package: &PackageRef, document: Document) -> IndexResult<PackageData> {
    match (document, &package.version) {
        (Document::Package, Some(version)) => {
            let data = ctx.index.package(&package.without_version()).await?;
            data.release(version)?;
            Ok(data)
        },
        _ => ctx.index.package(package).await,
    }
}

fn index_error(err: IndexError) -> Error {
    let kind = if err.is_retryable() { ErrorKind::Unavailable } else { ErrorKind::Index };
    err.raise(kind)
}

/// The index page of a package: the one it reports, or the conventional one.
fn package_url(ctx: &Context<'_>, package: &PackageRef, data: &PackageData) -> String {
    data.info.package_url.clone().unwrap_or_else(|| package.page_url(ctx.index.url()))
}
