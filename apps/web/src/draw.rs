use health_core::dataset::Bounds;
use health_core::view::scene::{CardsView, PlacedChart, Scene};
use health_core::view::{ChartKind, ChartSlot, FeatureStyle, MapLayer};
use health_core::Mode;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Map, MapResolution},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
        Tabs,
        Wrap,
    },
    Frame,
};

use crate::state::Dashboard;

const WORLD: Bounds = Bounds {
    south: -60.0,
    west: -180.0,
    north: 80.0,
    east: 180.0,
};

pub fn render(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(dashboard.active_mode(), f, main_layout[0]);

    if dashboard.loading {
        let paragraph = Paragraph::new(Text::from(TextLine::from("Loading datasets...")))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, main_layout[1]);
    } else {
        render_body(&dashboard.scene, f, main_layout[1]);
    }

    let footer = Paragraph::new(TextLine::from(Span::styled(
        "1-3 / ←→ mode  •  ↑↓ district  •  Enter zoom  •  Esc reset",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(footer, main_layout[2]);
}

fn render_header(active: Mode, f: &mut Frame<'_>, area: Rect) {
    let titles = Mode::ALL
        .iter()
        .map(|mode| TextLine::from(mode.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("Sharqia Health Dashboard")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .select(active.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, area);
}

fn render_body(scene: &Scene, f: &mut Frame<'_>, area: Rect) {
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(area);

    render_cards(scene.cards(), f, content[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(content[1]);
    render_map(scene, f, right[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);
    render_chart(scene.chart(ChartSlot::Comparison), f, charts[0]);
    render_chart(scene.chart(ChartSlot::Trend), f, charts[1]);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_cards(cards: &CardsView, f: &mut Frame<'_>, area: Rect) {
    let lines = match cards {
        CardsView::Empty => vec![TextLine::from("No data")],
        CardsView::Error(message) => vec![
            TextLine::from(Span::styled(
                "Could not load the dashboard data",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            TextLine::from(message.as_str()),
        ],
        CardsView::Cards(cards) => cards
            .iter()
            .flat_map(|card| {
                let style = if card.highlight {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                };
                std::iter::once(TextLine::from(Span::styled(card.title.clone(), style))).chain(
                    card.metrics.iter().flat_map(|metric| {
                        let color = severity_color(metric.severity);
                        let percent = metric
                            .percent_of_average
                            .map_or_else(String::new, |p| format!(" ({p:.1}% of avg)"));
                        [
                            TextLine::from(vec![
                                Span::styled(
                                    format!("  {}: ", metric.indicator.label()),
                                    Style::default().fg(Color::Gray),
                                ),
                                Span::raw(metric.indicator.format_value(metric.value)),
                                Span::styled(percent, Style::default().fg(color)),
                            ]),
                            TextLine::from(vec![
                                Span::raw("  "),
                                Span::styled(
                                    progress_bar(metric.bar_width),
                                    Style::default().fg(color),
                                ),
                            ]),
                        ]
                    }),
                )
            })
            .collect(),
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel("Summary"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_map(scene: &Scene, f: &mut Frame<'_>, area: Rect) {
    let view = scene.view().unwrap_or(WORLD);
    let title = scene
        .hovered_feature()
        .and_then(|feature| feature.tooltip.lines().next())
        .map_or_else(|| "Map".to_string(), |name| format!("Map: {name}"));

    let canvas = Canvas::default()
        .block(panel(&title))
        .marker(Marker::Braille)
        .x_bounds([view.west, view.east])
        .y_bounds([view.south, view.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for placed in scene.layers() {
                match &placed.layer {
                    MapLayer::Polygons(features) => {
                        for feature in placed.paint_order().into_iter().filter_map(|i| features.get(i)) {
                            let color = stroke_color(&feature.style);
                            for ring in &feature.rings {
                                for pair in ring.windows(2) {
                                    ctx.draw(&CanvasLine {
                                        x1: pair[0].lng,
                                        y1: pair[0].lat,
                                        x2: pair[1].lng,
                                        y2: pair[1].lat,
                                        color,
                                    });
                                }
                            }
                        }
                    }
                    MapLayer::Circles(circles) => {
                        let scale = (view.east - view.west) / 250.0;
                        for circle in circles {
                            ctx.draw(&Circle {
                                x: circle.center.lng,
                                y: circle.center.lat,
                                radius: circle.radius * scale,
                                color: hex_color(circle.color),
                            });
                        }
                    }
                    MapLayer::Markers(markers) => {
                        for marker in markers {
                            ctx.print(
                                marker.at.lng,
                                marker.at.lat,
                                Span::styled(
                                    format!("◆ {}", marker.label),
                                    Style::default().fg(Color::Yellow),
                                ),
                            );
                        }
                    }
                    MapLayer::Legend { .. } => {}
                }
            }
        });
    f.render_widget(canvas, area);

    for placed in scene.layers() {
        if let MapLayer::Legend { title, entries, .. } = &placed.layer {
            let lines = entries
                .iter()
                .rev()
                .map(|entry| {
                    TextLine::from(vec![
                        Span::styled("■ ", Style::default().fg(hex_color(entry.color))),
                        Span::raw(entry.label.clone()),
                    ])
                })
                .collect::<Vec<_>>();
            let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
            let width = 16.min(area.width.saturating_sub(2));
            let legend_area = Rect {
                x: area.x + area.width.saturating_sub(width + 1),
                y: area.y + area.height.saturating_sub(height + 1),
                width,
                height,
            };
            f.render_widget(Clear, legend_area);
            f.render_widget(
                Paragraph::new(Text::from(lines)).block(
                    Block::default()
                        .title(title.as_str())
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Gray)),
                ),
                legend_area,
            );
        }
    }
}

fn render_chart(chart: Option<&PlacedChart>, f: &mut Frame<'_>, area: Rect) {
    let Some(chart) = chart else {
        let paragraph = Paragraph::new("No chart")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(panel("Chart"));
        f.render_widget(paragraph, area);
        return;
    };
    let spec = &chart.spec;
    let (low, high) = spec.value_range();

    match spec.kind {
        ChartKind::Bar => {
            let mut bar_chart = BarChart::default()
                .block(panel(&spec.title))
                .max(((high.max(0.0) * 10.0).round() as u64).max(1))
                .bar_width(4)
                .group_gap(1);
            for (index, label) in spec.labels.iter().enumerate() {
                let bars = spec
                    .datasets
                    .iter()
                    .filter_map(|dataset| {
                        let value = dataset.values.get(index).copied().filter(|v| v.is_finite())?;
                        Some(
                            Bar::default()
                                .value((value.max(0.0) * 10.0).round() as u64)
                                .text_value(format!("{value:.0}"))
                                .style(Style::default().fg(hex_color(dataset.color))),
                        )
                    })
                    .collect::<Vec<_>>();
                bar_chart = bar_chart.data(
                    BarGroup::default()
                        .label(TextLine::from(label.chars().take(8).collect::<String>()))
                        .bars(&bars),
                );
            }
            f.render_widget(bar_chart, area);
        }
        ChartKind::Line => {
            let series = spec
                .datasets
                .iter()
                .map(|dataset| {
                    dataset
                        .values
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(i, v)| (i as f64, *v))
                        .collect::<Vec<_>>()
                })
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
            let margin = (high - low).abs().max(1.0) * 0.1;
            let line_chart = Chart::new(datasets)
                .block(panel(&spec.title))
                .x_axis(
                    Axis::default()
                        .bounds([0.0, (last as f64).max(1.0)])
                        .labels(
                            [spec.labels.first(), spec.labels.last()]
                                .into_iter()
                                .flatten()
                                .map(|label| Span::raw(label.clone()))
                                .collect::<Vec<_>>(),
                        ),
                )
                .y_axis(
                    Axis::default()
                        .bounds([low - margin, high + margin])
                        .labels(vec![
                            Span::raw(format!("{:.1}", low - margin)),
                            Span::raw(format!("{:.1}", high + margin)),
                        ]),
                );
            f.render_widget(line_chart, area);
        }
    }
}

const fn severity_color(severity: health_core::scale::Severity) -> Color {
    match severity {
        health_core::scale::Severity::Good => Color::Green,
        health_core::scale::Severity::Warning => Color::Red,
    }
}

const BAR_CELLS: usize = 20;

/// Text progress bar for a width in percent.
pub fn progress_bar(width_percent: f64) -> String {
    let filled = ((width_percent.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Highlighted features are outlined in white, the rest in their fill.
pub fn stroke_color(style: &FeatureStyle) -> Color {
    if style.weight > FeatureStyle::filled(style.fill).weight {
        Color::White
    } else {
        hex_color(style.fill)
    }
}

/// `#RRGGBB` to a terminal colour; anything else is gray.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::Gray;
    }
    match u32::from_str_radix(digits, 16) {
        Ok(rgb) => Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
        Err(_) => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::{hex_color, progress_bar, stroke_color};
    use health_core::view::FeatureStyle;
    use ratzilla::ratatui::style::Color;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#FFEDA0"), Color::Rgb(0xFF, 0xED, 0xA0));
        assert_eq!(hex_color("orange"), Color::Gray);
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0), "░".repeat(20));
        assert_eq!(progress_bar(54.0), format!("{}{}", "█".repeat(11), "░".repeat(9)));
        assert_eq!(progress_bar(140.0), "█".repeat(20));
    }

    #[test]
    fn highlighted_outline_is_white() {
        let style = FeatureStyle::filled("#FD8D3C");
        assert_eq!(stroke_color(&style), Color::Rgb(0xFD, 0x8D, 0x3C));
        assert_eq!(stroke_color(&style.highlighted()), Color::White);
    }
}
