use super::{Context, Document, Lookup, lookup, package_url};
use crate::cli::StatArgs;
use crate::error::{ErrorKind, Result};
use crate::output::{self, Report};
use console::Style;
use exn::ResultExt;
use pypi_chart::thousands;
use pypi_stats::summarize;
use std::io::Write;
use tracing::instrument;

/// Prints download statistics for each package in turn.
#[instrument(skip_all, fields(packages = args.packages.len(), graph = args.graph()))]
pub(super) async fn run(ctx: &Context<'_>, args: &StatArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
    let chart = ctx
        .config
        .chart
        .bar_chart(ctx.width)
        .with_label_style(Style::new().cyan().bold())
        .with_value_style(Style::new().yellow());
    let date_format = ctx.config.chart.date_format().or_raise(|| ErrorKind::Config)?;

    for input in &args.packages {
        let Lookup::Found(package, data) = lookup(ctx, input, Document::Package, err).await? else {
            continue;
        };
        output::say(out, format_args!("Fetching statistics for '{}'. . .", package_url(ctx, &package, &data)))?;
        let stats = summarize(data.release_records().or_raise(|| ErrorKind::Index)?);
        let (Some(min_version), min) = stats.min() else {
            exn::bail!(ErrorKind::NoReleases(package.name.clone()));
        };
        let (max_version, max) = stats.max();

        let mut report = Report::default();
        report.blank().header(&format!("Download statistics for {}", package.name));
        if args.graph() {
            let rendered = stats
                .render_chart(&chart, ctx.config.chart.version_width, &date_format)
                .or_raise(|| ErrorKind::Output)?;
            report.blank().line("Downloads by version").line(rendered);
        }
        report
            .blank()
            .line(format_args!("Min downloads:   {:>12} ({min_version})", thousands(min)))
            .line(format_args!("Max downloads:   {:>12} ({})", thousands(max), max_version.unwrap_or_default()))
            .line(format_args!("Avg downloads:   {:>12}", thousands(stats.average())))
            .line(format_args!("Total downloads: {:>12}", thousands(stats.total())))
            .blank()
            .downloads(&data.info.downloads)
            .blank();
        report.write_to(out)?;
    }
    Ok(())
}
