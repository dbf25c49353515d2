use health_core::view::scene::CardsView;
use health_core::view::{CardMetric, SummaryCard};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::{empty_panel, panel, severity_color};

const BAR_CELLS: usize = 20;

pub fn render_cards(cards: &CardsView, f: &mut Frame<'_>, area: Rect) {
    match cards {
        CardsView::Empty => f.render_widget(empty_panel(" Summary ", "No data"), area),
        CardsView::Error(message) => {
            let paragraph = Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(
                    "Could not load the dashboard data",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                TextLine::from(""),
                TextLine::from(Span::styled(message.as_str(), Style::default().fg(Color::White))),
            ]))
            .block(panel(" Summary ", Color::Red))
            .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        }
        CardsView::Cards(cards) => {
            let lines = cards.iter().flat_map(card_lines).collect::<Vec<_>>();
            let paragraph = Paragraph::new(Text::from(lines))
                .block(panel(" Summary ", Color::Cyan))
                .wrap(Wrap { trim: false });
            f.render_widget(paragraph, area);
        }
    }
}

fn card_lines(card: &SummaryCard) -> Vec<TextLine<'static>> {
    let title_style = if card.highlight {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let marker = if card.highlight { "★ " } else { "▌ " };

    let mut lines = vec![TextLine::from(vec![
        Span::styled(marker, title_style),
        Span::styled(card.title.clone(), title_style),
    ])];
    for metric in &card.metrics {
        lines.extend(metric_lines(metric));
    }
    lines.push(TextLine::from(""));
    lines
}

fn metric_lines(metric: &CardMetric) -> [TextLine<'static>; 2] {
    let color = severity_color(metric.severity);
    let comparison = metric
        .percent_of_average
        .map_or_else(String::new, |percent| format!("  {percent:.1}% of avg"));

    [
        TextLine::from(vec![
            Span::styled(
                format!("  {}: ", metric.indicator.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                metric.indicator.format_value(metric.value),
                Style::default().fg(Color::White),
            ),
            Span::styled(comparison, Style::default().fg(color)),
        ]),
        TextLine::from(vec![
            Span::raw("  "),
            Span::styled(progress_bar(metric.bar_width), Style::default().fg(color)),
        ]),
    ]
}

/// Text progress bar for a width in percent.
pub fn progress_bar(width_percent: f64) -> String {
    let filled = ((width_percent.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0), "░".repeat(20));
        assert_eq!(progress_bar(100.0), "█".repeat(20));
        assert_eq!(progress_bar(50.0), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(progress_bar(250.0), "█".repeat(20));
    }
}
