pub mod cards;
pub mod charts;
pub mod map;
pub mod popup;

use health_core::scale::Severity;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

/// `#RRGGBB` to a terminal colour; anything else renders gray.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::Gray;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

pub const fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Good => Color::Green,
        Severity::Warning => Color::Red,
    }
}

pub fn panel(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// Bordered placeholder for a panel with nothing to show.
pub fn empty_panel<'a>(title: &'a str, message: &'a str) -> Paragraph<'a> {
    Paragraph::new(message)
        .block(panel(title, Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(Color::Gray))
}
