use super::{Context, index_error};
use crate::cli::SearchArgs;
use crate::error::Result;
use crate::output::{self, Report};
use console::style;
use pypi_search::{Query, SearchCandidate};
use std::io::Write;
use textwrap::WrapAlgorithm;
use tracing::instrument;

/// Searches the index, or opens its web search page with `--web`.
#[instrument(skip_all, fields(query = %args.query, web = args.web))]
pub(super) async fn run(ctx: &Context<'_>, args: &SearchArgs, out: &mut dyn Write) -> Result<()> {
    if args.web {
        output::say(out, style(format!("Opening search page for \"{}\"...", args.query)).bold())?;
        let url = ctx.config.index.web_search_url(&urlencoding::encode(&args.query));
        return ctx.launcher.open(&url);
    }

    let query = Query::parse(&args.query);
    let candidates = ctx.index.search(query.tokens()).await.map_err(index_error)?;
    let limit = match args.n_results.unwrap_or(ctx.config.search.results) {
        0 => None,
        n => Some(n),
    };
    let results = query.rank(candidates, limit);
    tracing::debug!(results = results.len(), "Ranked search results");

    let mut report = Report::default();
    report.line(style(format!("Search results for \"{}\"", args.query)).bold());
    for result in &results {
        report.line(format_result(result, ctx.config.search.name_width, ctx.width, ctx.config.chart.margin));
    }
    report.write_to(out)
}

/// `name - summary`, with the summary wrapped to the right of the name column.
///
/// Packages without a summary, or with a blank one, repeat their name.
fn format_result(result: &SearchCandidate, name_width: usize, width: usize, margin: usize) -> String {
    let summary = result.summary.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(&result.name);
    let wrap_width = width.saturating_sub(name_width + margin).max(1);
    let continuation = format!("\n{}", " ".repeat(name_width + 3));
    let options = textwrap::Options::new(wrap_width).wrap_algorithm(WrapAlgorithm::FirstFit);
    let summary = textwrap::wrap(summary, options).join(&continuation);
    let name = format!("{:<name_width$}", result.name);
    format!("{} - {summary}", style(name).cyan().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::tests::RecordingLauncher;
    use crate::commands::testing::{capture, parse};
    use console::strip_ansi_codes;
    use pypi_index::MockIndex;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> MockIndex {
        // As returned by the index: unordered, with a duplicate.
        MockIndex::default().with_search_results([
            SearchCandidate::new("flask-restful", Some("Simple framework for creating REST APIs & flask extension")),
            SearchCandidate::new("flask", None::<String>),
            SearchCandidate::new("flask-restful", None::<String>),
            SearchCandidate::new("flask-login", Some("User session management for Flask")),
        ])
    }

    #[tokio::test]
    #[rstest]
    async fn test_search_ranks_and_wraps(index: MockIndex) {
        let captured = capture(&index, &RecordingLauncher::default(), parse(&["search", "flask"])).await;
        captured.result.unwrap();
        assert_eq!(
            captured.out,
            concat!(
                "Search results for \"flask\"\n",
                "flask                     - flask\n",
                "flask-restful             - Simple framework for creating REST APIs & flask\n",
                "                            extension\n",
                "flask-login               - User session management for Flask\n",
            )
        );
        assert_eq!(index.searches().await, vec![vec!["flask".to_string()]]);
    }

    #[tokio::test]
    #[rstest]
    async fn test_search_limit(index: MockIndex) {
        let captured = capture(&index, &RecordingLauncher::default(), parse(&["search", "flask", "-n", "2"])).await;
        captured.result.unwrap();
        // Continuation lines of wrapped summaries start with padding.
        let names: Vec<&str> = captured
            .out
            .lines()
            .skip(1)
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(names, ["flask", "flask-restful"]);
    }

    #[tokio::test]
    #[rstest]
    async fn test_search_zero_limit_shows_everything(index: MockIndex) {
        let captured = capture(&index, &RecordingLauncher::default(), parse(&["search", "flask", "-n", "0"])).await;
        captured.result.unwrap();
        assert_eq!(captured.out.lines().count(), 5);
    }

    #[tokio::test]
    #[rstest]
    async fn test_search_drops_stop_words(index: MockIndex) {
        let captured = capture(&index, &RecordingLauncher::default(), parse(&["search", "The Flask for REST"])).await;
        captured.result.unwrap();
        assert_eq!(index.searches().await, vec![vec!["flask".to_string(), "rest".to_string()]]);
        assert!(captured.out.starts_with("Search results for \"The Flask for REST\"\n"));
    }

    #[tokio::test]
    #[rstest]
    async fn test_search_web(index: MockIndex) {
        let launcher = RecordingLauncher::default();
        let captured = capture(&index, &launcher, parse(&["search", "requests toolbelt", "--web"])).await;
        captured.result.unwrap();
        assert_eq!(captured.out, "Opening search page for \"requests toolbelt\"...\n");
        assert_eq!(launcher.opened(), ["https://pypi.org/search/?q=requests%20toolbelt"]);
        assert!(index.searches().await.is_empty());
    }

    #[rstest]
    #[case(None, 80, "short - short")]
    #[case(Some(" "), 80, "short - short")]
    #[case(Some("one two three"), 14, "short - one\n        two\n        three")]
    fn test_format_result(#[case] summary: Option<&str>, #[case] width: usize, #[case] expected: &str) {
        let result = SearchCandidate::new("short", summary);
        let formatted = format_result(&result, 5, width, 3);
        assert_eq!(strip_ansi_codes(&formatted), expected);
    }
}
