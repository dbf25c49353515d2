use health_core::dataset::Bounds;
use health_core::view::scene::Scene;
use health_core::view::{Corner, FeatureStyle, LegendEntry, MapLayer, PolygonFeature};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::popup::corner_rect;
use super::{hex_color, panel};

/// Whole world, used before any mode fits the view.
const WORLD: Bounds = Bounds {
    south: -60.0,
    west: -180.0,
    north: 80.0,
    east: 180.0,
};

/// Circle radii are screen-sized; this maps them onto the visible span.
const CIRCLE_RADIUS_DIVISOR: f64 = 250.0;

pub fn render_map(scene: &Scene, f: &mut Frame<'_>, area: Rect) {
    let tooltip = scene.hovered_feature().map(|feature| feature.tooltip.as_str());
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(if tooltip.is_some() { 6 } else { 0 }),
        ])
        .split(area);

    let view = scene.view().unwrap_or(WORLD);
    let canvas = Canvas::default()
        .block(panel(" Map ", Color::Green))
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
                        for index in placed.paint_order() {
                            if let Some(feature) = features.get(index) {
                                draw_polygon(ctx, feature);
                            }
                        }
                    }
                    MapLayer::Circles(circles) => {
                        let scale = (view.east - view.west) / CIRCLE_RADIUS_DIVISOR;
                        for circle in circles {
                            ctx.draw(&Circle {
                                x: circle.center.lng,
                                y: circle.center.lat,
                                radius: circle.radius * scale,
                                color: hex_color(circle.color),
                            });
                            if circle.highlight {
                                ctx.print(
                                    circle.center.lng,
                                    circle.center.lat,
                                    Span::styled(
                                        circle.label.clone(),
                                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                                    ),
                                );
                            }
                        }
                    }
                    MapLayer::Markers(markers) => {
                        for marker in markers {
                            ctx.print(
                                marker.at.lng,
                                marker.at.lat,
                                Span::styled(
                                    format!("◆ {}", marker.label),
                                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                                ),
                            );
                        }
                    }
                    MapLayer::Legend { .. } => {}
                }
            }
        });
    f.render_widget(canvas, split[0]);

    for placed in scene.layers() {
        if let MapLayer::Legend {
            corner,
            title,
            entries,
        } = &placed.layer
        {
            render_legend(*corner, title, entries, f, split[0]);
        }
    }

    if let Some(tooltip) = tooltip {
        let paragraph = Paragraph::new(Text::from(
            tooltip.lines().map(TextLine::from).collect::<Vec<_>>(),
        ))
        .block(panel(" Selected ", Color::Yellow))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, split[1]);
    }
}

fn draw_polygon(ctx: &mut Context<'_>, feature: &PolygonFeature) {
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
    if let Some(bounds) = feature.bounds() {
        let center = bounds.center();
        ctx.print(
            center.lng,
            center.lat,
            Span::styled(feature.name.clone(), Style::default().fg(color)),
        );
    }
}

/// Outlines carry the fill colour; a highlighted feature is drawn white.
pub fn stroke_color(style: &FeatureStyle) -> Color {
    if style.weight > FeatureStyle::filled(style.fill).weight {
        Color::White
    } else {
        hex_color(style.fill)
    }
}

fn render_legend(corner: Corner, title: &str, entries: &[LegendEntry], f: &mut Frame<'_>, map: Rect) {
    let inner = map.inner(ratatui::layout::Margin::new(1, 1));
    let width = entries
        .iter()
        .map(|entry| entry.label.chars().count() as u16 + 4)
        .chain(std::iter::once(title.chars().count() as u16))
        .max()
        .unwrap_or(0)
        + 2;
    let height = entries.len() as u16 + 2;
    let (right, bottom) = match corner {
        Corner::TopLeft => (false, false),
        Corner::TopRight => (true, false),
        Corner::BottomLeft => (false, true),
        Corner::BottomRight => (true, true),
    };
    let area = corner_rect(inner, width, height, right, bottom);

    let lines = entries
        .iter()
        .rev()
        .map(|entry| {
            TextLine::from(vec![
                Span::styled("██ ", Style::default().fg(hex_color(entry.color))),
                Span::raw(entry.label.clone()),
            ])
        })
        .collect::<Vec<_>>();
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_outline_is_white() {
        let style = FeatureStyle::filled("#800026");
        assert_eq!(stroke_color(&style), Color::Rgb(0x80, 0x00, 0x26));
        assert_eq!(stroke_color(&style.highlighted()), Color::White);
    }
}
