use super::{Context, Document, Lookup, lookup, package_url};
use crate::cli::InfoArgs;
use crate::error::Result;
use crate::output::Report;
use std::io::Write;
use tracing::instrument;

/// License text longer than this starts on its own line.
const INLINE_LICENSE_MAX: usize = 80;

/// Prints metadata for each package in turn.
#[instrument(skip_all, fields(packages = args.packages.len()))]
pub(super) async fn run(ctx: &Context<'_>, args: &InfoArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    for input in &args.packages {
        let Lookup::Found(package, data) = lookup(ctx, input, Document::AsNamed, err).await? else {
            continue;
        };
        let info = &data.info;
        let mut report = Report::default();

        report.header(input);
        if let Some(summary) = &info.summary {
            report.line(summary);
        }
        report.blank().line(format_args!("Latest release:   {}", info.version));

        if args.long_description {
            report.blank().line(info.description.as_deref().unwrap_or_default());
        }

        report.blank().downloads(&info.downloads);

        report.blank();
        if let Some(author) = &info.author {
            report.line(format_args!("Author:   {author}"));
        }
        if let Some(author_email) = &info.author_email {
            report.line(format_args!("Author email: {author_email}"));
        }

        if info.maintainer.is_some() || info.maintainer_email.is_some() {
            report.blank();
        }
        if let Some(maintainer) = &info.maintainer {
            report.line(format_args!("Maintainer:   {maintainer}"));
        }
        if let Some(maintainer_email) = &info.maintainer_email {
            report.line(format_args!("Maintainer email: {maintainer_email}"));
        }

        report.blank().line(format_args!("PyPI URL:  {}", package_url(ctx, &package, &data)));
        if let Some(home_page) = &info.home_page {
            report.line(format_args!("Home Page: {home_page}"));
        }
        if let Some(docs_url) = &info.docs_url {
            report.line(format_args!("Documentation: {docs_url}"));
        }

        if args.classifiers {
            report.blank().line("Classifiers: ");
            for classifier in &info.classifiers {
                report.line(format_args!("\t{classifier}"));
            }
        }

        if let Some(license) = info.license.as_deref().filter(|_| args.license()) {
            report.blank();
            // A bare name (e.g. "BSD") stays inline; full license text does not.
            if license.contains('\n') || license.chars().count() > INLINE_LICENSE_MAX {
                report.line("License: ").line(license);
            } else {
                report.line(format_args!("License: {license}"));
            }
        }
        report.blank();
        report.write_to(out)?;
    }
    Ok(())
}
