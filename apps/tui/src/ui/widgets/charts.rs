use health_core::view::scene::PlacedChart;
use health_core::view::{ChartKind, ChartSpec};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType};
use ratatui::Frame;

use super::{empty_panel, hex_color, panel};

/// Bar values are integers; one decimal place is kept by scaling.
const BAR_SCALE: f64 = 10.0;

pub fn render_chart(chart: Option<&PlacedChart>, empty_title: &str, f: &mut Frame<'_>, area: Rect) {
    let Some(chart) = chart else {
        f.render_widget(empty_panel(empty_title, "No chart"), area);
        return;
    };
    match chart.spec.kind {
        ChartKind::Bar => render_bar_chart(&chart.spec, f, area),
        ChartKind::Line => render_line_chart(&chart.spec, f, area),
    }
}

fn chart_block(spec: &ChartSpec) -> Block<'_> {
    let mut legend = Vec::new();
    for dataset in &spec.datasets {
        legend.push(Span::styled("■ ", Style::default().fg(hex_color(dataset.color))));
        legend.push(Span::styled(
            format!("{} ", dataset.label),
            Style::default().fg(Color::Gray),
        ));
    }
    panel(&spec.title, Color::Cyan)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .title(TextLine::from(legend).alignment(Alignment::Right))
}

fn render_bar_chart(spec: &ChartSpec, f: &mut Frame<'_>, area: Rect) {
    let groups = spec
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let bars = spec
                .datasets
                .iter()
                .filter_map(|dataset| {
                    let value = *dataset.values.get(index)?;
                    value.is_finite().then(|| {
                        Bar::default()
                            .value(scaled(value))
                            .text_value(format!("{value:.1}"))
                            .style(Style::default().fg(hex_color(dataset.color)))
                            .value_style(
                                Style::default()
                                    .fg(Color::Black)
                                    .bg(hex_color(dataset.color))
                                    .add_modifier(Modifier::BOLD),
                            )
                    })
                })
                .collect::<Vec<_>>();
            (short_label(label), bars)
        })
        .collect::<Vec<_>>();

    let (_, high) = spec.value_range();
    let mut chart = BarChart::default()
        .block(chart_block(spec))
        .max(scaled(high).max(1))
        .bar_width(5)
        .bar_gap(0)
        .group_gap(2);
    for (label, bars) in &groups {
        chart = chart.data(
            BarGroup::default()
                .label(TextLine::from(label.as_str()))
                .bars(bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_line_chart(spec: &ChartSpec, f: &mut Frame<'_>, area: Rect) {
    let series = spec
        .datasets
        .iter()
        .map(|dataset| line_points(&dataset.values))
        .collect::<Vec<_>>();

    let datasets = spec
        .datasets
        .iter()
        .zip(&series)
        .map(|(dataset, points)| {
            Dataset::default()
                .name(dataset.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(hex_color(dataset.color)))
                .data(points)
        })
        .collect::<Vec<_>>();

    let last = spec.labels.len().saturating_sub(1);
    let x_labels = [0, last / 2, last]
        .into_iter()
        .filter_map(|index| spec.labels.get(index))
        .map(|label| Span::raw(label.clone()))
        .collect::<Vec<_>>();

    let (low, high) = padded_range(spec.value_range());
    let y_labels = vec![
        Span::raw(format!("{low:.1}")),
        Span::raw(format!("{:.1}", (low + high) / 2.0)),
        Span::raw(format!("{high:.1}")),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(spec))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (last as f64).max(1.0)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn scaled(value: f64) -> u64 {
    (value.max(0.0) * BAR_SCALE).round() as u64
}

/// Plot points by year index; gaps (NaN) are left out.
pub fn line_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(index, value)| (index as f64, *value))
        .collect()
}

/// Adds a margin so lines do not sit on the chart border.
fn padded_range((low, high): (f64, f64)) -> (f64, f64) {
    let span = (high - low).abs().max(1.0);
    (low - span * 0.1, high + span * 0.1)
}

fn short_label(label: &str) -> String {
    const MAX: usize = 10;
    if label.chars().count() <= MAX {
        label.to_string()
    } else {
        let mut short = label.chars().take(MAX - 1).collect::<String>();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn gaps_are_skipped() {
        let points = line_points(&[14.0, f64::NAN, 15.2]);
        assert_eq!(points, vec![(0.0, 14.0), (2.0, 15.2)]);
    }

    #[test]
    fn range_gets_a_margin() {
        let (low, high) = padded_range((14.0, 16.0));
        assert_close(low, 13.8);
        assert_close(high, 16.2);
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("Zagazig"), "Zagazig");
        assert_eq!(short_label("10th of Ramadan"), "10th of R…");
    }

    #[test]
    fn bar_values_keep_one_decimal() {
        assert_eq!(scaled(18.4), 184);
        assert_eq!(scaled(-3.0), 0);
    }
}
