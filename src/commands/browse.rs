use super::{Context, index_error, package_url};
use crate::cli::BrowseArgs;
use crate::error::{ErrorKind, Result};
use crate::output;
use console::style;
use exn::{OptionExt, ResultExt};
use pypi_index::PackageRef;
use pypi_index::error::ErrorKind as IndexErrorKind;
use std::io::Write;
use tracing::instrument;

/// Opens a package's index page, or its home page, in the browser.
#[instrument(skip_all, fields(package = %args.package, homepage = args.homepage))]
pub(super) async fn run(ctx: &Context<'_>, args: &BrowseArgs, out: &mut dyn Write) -> Result<()> {
    let package = PackageRef::parse(&args.package).or_raise(|| ErrorKind::NotFound(args.package.clone()))?;
    let data = match ctx.index.package(&package).await {
        Ok(data) => data,
        Err(e) if matches!(&*e, IndexErrorKind::NotFound(_)) => {
            return Err(e.raise(ErrorKind::NotFound(args.package.clone())));
        },
        Err(e) => return Err(index_error(e)),
    };
    let url = if args.homepage {
        output::say(out, style(format!("Opening homepage for \"{}\"...", args.package)).bold())?;
        data.info.home_page.ok_or_raise(|| ErrorKind::NoHomePage(args.package.clone()))?
    } else {
        output::say(out, style(format!("Opening PyPI page for \"{}\"...", args.package)).bold())?;
        package_url(ctx, &package, &data)
    };
    ctx.launcher.open(&url)
}
