//! Proportionally scaled bar charts for the terminal.
//!
//! A chart is an ordered list of [`ChartEntry`] values. Each entry becomes one
//! line made of three columns: the (possibly truncated) label, the value with
//! thousands separators, and a bar of tick characters whose length is scaled
//! against the largest value in the chart:
//!
//! ```text
//! 0.1.0                14/02/08 [  1,024 ] ********
//! 0.2.0                14/03/11 [ 12,345 ] ******************************
//! ```
//!
//! The display width is always an explicit input; nothing in this crate
//! queries the terminal. Label and value styles are applied after padding,
//! so escape codes never count towards a column's width.

mod format;

pub use crate::format::thousands;
use console::Style;
use tracing::instrument;

/// Character used to draw one unit of a bar.
pub const DEFAULT_TICK: char = '*';
/// Columns kept free on the right-hand side of every line.
pub const DEFAULT_MARGIN: usize = 3;
/// Labels longer than this are truncated for display.
pub const DEFAULT_MAX_LABEL_WIDTH: usize = 30;
/// Width of the ` [ ` and ` ] ` decorations either side of the value column.
const DECORATION_WIDTH: usize = 3;

/// A single labelled value in a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    pub label: String,
    pub value: u64,
}
impl ChartEntry {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self { label: label.into(), value }
    }
}
impl<L: Into<String>> From<(L, u64)> for ChartEntry {
    fn from((label, value): (L, u64)) -> Self {
        Self::new(label, value)
    }
}

/// Column widths and bar lengths computed for one set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) label_width: usize,
    pub(crate) value_width: usize,
    pub(crate) bar_area_width: usize,
    pub(crate) bars: Vec<usize>,
}

/// Bar chart renderer.
///
/// Configure once and call [`render`](Self::render) for every dataset.
///
/// ```rust
/// use pypi_chart::{BarChart, ChartEntry};
///
/// let chart = BarChart::new(40).with_margin(0);
/// let output = chart.render(&[ChartEntry::new("a", 1), ChartEntry::new("b", 2)]);
/// assert_eq!(output.lines().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    display_width: usize,
    max_label_width: usize,
    margin: usize,
    tick: char,
    label_style: Style,
    value_style: Style,
}
impl BarChart {
    pub fn new(display_width: usize) -> Self {
        Self {
            display_width,
            max_label_width: DEFAULT_MAX_LABEL_WIDTH,
            margin: DEFAULT_MARGIN,
            tick: DEFAULT_TICK,
            label_style: Style::new(),
            value_style: Style::new(),
        }
    }

    pub fn with_max_label_width(mut self, max_label_width: usize) -> Self {
        self.max_label_width = max_label_width;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_tick(mut self, tick: char) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    pub fn with_value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    pub(crate) fn layout(&self, entries: &[ChartEntry]) -> Layout {
        let longest_label = entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);
        let label_width = longest_label.min(self.max_label_width);
        let value_width = entries.iter().map(|e| thousands(e.value).len()).max().unwrap_or(0);
        let bar_area_width = self
            .display_width
            .saturating_sub(self.margin)
            .saturating_sub(label_width + DECORATION_WIDTH + value_width + DECORATION_WIDTH);
        let max_value = entries.iter().map(|e| e.value).max().unwrap_or(0);
        let bars = entries
            .iter()
            .map(|entry| {
                if max_value == 0 {
                    return 0;
                }
                // value <= max_value, so the result never exceeds the bar area.
                let scaled = (bar_area_width as u128 * entry.value as u128).div_ceil(max_value as u128);
                scaled as usize
            })
            .collect();
        Layout { label_width, value_width, bar_area_width, bars }
    }

    /// Renders one line per entry, joined with newlines.
    ///
    /// An empty slice renders an empty string. When every value is zero no
    /// bar contains a tick.
    #[instrument(level = "trace", skip(entries), fields(entries = entries.len()))]
    pub fn render(&self, entries: &[ChartEntry]) -> String {
        let layout = self.layout(entries);
        tracing::trace!(
            label_width = layout.label_width,
            value_width = layout.value_width,
            bar_area_width = layout.bar_area_width,
            "Computed chart layout"
        );
        entries
            .iter()
            .zip(&layout.bars)
            .map(|(entry, &bar)| {
                let label: String = entry.label.chars().take(layout.label_width).collect();
                let label = format!("{label:<lw$}", lw = layout.label_width);
                let value = format!("{:>vw$}", thousands(entry.value), vw = layout.value_width);
                let bar: String = std::iter::repeat_n(self.tick, bar).collect();
                format!(
                    "{} [ {} ] {bar}",
                    self.label_style.apply_to(label),
                    self.value_style.apply_to(value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders `entries` as a bar chart fitting within `display_width` columns.
///
/// Shorthand for configuring a [`BarChart`] with the default tick character.
pub fn render(entries: &[ChartEntry], display_width: usize, max_label_width: usize, margin: usize) -> String {
    BarChart::new(display_width)
        .with_max_label_width(max_label_width)
        .with_margin(margin)
        .render(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn releases() -> Vec<ChartEntry> {
        vec![
            ChartEntry::new("0.1.0", 10),
            ChartEntry::new("0.2.0", 30),
            ChartEntry::new("0.3.0", 20),
            ChartEntry::new("0.3.1", 0),
        ]
    }

    fn ticks(line: &str) -> usize {
        line.rsplit(" ] ").next().unwrap().chars().filter(|c| *c == DEFAULT_TICK).count()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(10)]
    fn all_zero_values_draw_no_ticks(#[case] count: usize) {
        let entries: Vec<_> = (0..count).map(|i| ChartEntry::new(format!("v{i}"), 0)).collect();
        let output = render(&entries, 80, 30, 3);
        assert_eq!(output.lines().count(), count);
        assert!(!output.contains(DEFAULT_TICK));
    }

    #[test]
    fn empty_dataset_renders_nothing() {
        assert_eq!(render(&[], 80, 30, 3), "");
    }

    #[rstest]
    fn largest_value_fills_bar_area(releases: Vec<ChartEntry>) {
        let chart = BarChart::new(80);
        let layout = chart.layout(&releases);
        // 80 - 3 - (5 + 3 + 2 + 3)
        assert_eq!(layout.bar_area_width, 64);
        assert_eq!(layout.bars, vec![22, 64, 43, 0]);
        let output = chart.render(&releases);
        let widest = output.lines().nth(1).unwrap();
        assert_eq!(ticks(widest), 64);
        assert_eq!(widest.chars().count(), 80 - DEFAULT_MARGIN);
    }

    #[rstest]
    #[case(40)]
    #[case(80)]
    #[case(200)]
    fn bar_length_is_monotonic(releases: Vec<ChartEntry>, #[case] width: usize) {
        let layout = BarChart::new(width).layout(&releases);
        for (a, bar_a) in releases.iter().zip(&layout.bars) {
            assert!(*bar_a <= layout.bar_area_width);
            for (b, bar_b) in releases.iter().zip(&layout.bars) {
                if a.value >= b.value {
                    assert!(bar_a >= bar_b, "{} ({bar_a}) shorter than {} ({bar_b})", a.label, b.label);
                }
            }
        }
    }

    #[test]
    fn narrow_display_clamps_bar_area() {
        let entries = [ChartEntry::new("a-very-long-version-label", 123_456)];
        let layout = BarChart::new(10).layout(&entries);
        assert_eq!(layout.bar_area_width, 0);
        assert_eq!(layout.bars, vec![0]);
    }

    #[test]
    fn labels_are_truncated_and_padded() {
        let entries = [ChartEntry::new("abcdefghij", 5), ChartEntry::new("ab", 1_000)];
        let output = BarChart::new(30).with_max_label_width(4).with_margin(0).render(&entries);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "abcd [     5 ] *");
        assert_eq!(lines[1], "ab   [ 1,000 ] ***************");
    }

    #[test]
    fn styles_do_not_change_layout() {
        let entries = [ChartEntry::new("0.1.0", 5), ChartEntry::new("0.10.0", 1_000)];
        let plain = BarChart::new(40).render(&entries);
        let styled = BarChart::new(40)
            .with_label_style(Style::new().cyan().bold().force_styling(true))
            .with_value_style(Style::new().yellow().force_styling(true))
            .render(&entries);
        assert_ne!(styled, plain);
        assert!(styled.contains("\u{1b}[36m"));
        assert_eq!(console::strip_ansi_codes(&styled), plain);
    }

    #[test]
    fn custom_tick() {
        let output = BarChart::new(20).with_margin(0).with_tick('#').render(&[ChartEntry::new("x", 1)]);
        assert_eq!(output, "x [ 1 ] ############");
    }
}
