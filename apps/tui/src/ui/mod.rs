// Paints the dashboard scene into the terminal

pub mod widgets;

use crate::app::{App, LoadState};
use health_core::view::ChartSlot;
use health_core::Mode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;
use widgets::cards::render_cards;
use widgets::charts::render_chart;
use widgets::map::render_map;
use widgets::popup::centered_rect;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and mode selector
            Constraint::Min(10),   // Dashboard
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title(app, f, main_layout[0]);
    match app.load_state {
        LoadState::Loading => render_loading(app, f, main_layout[1]),
        LoadState::Ready | LoadState::Failed => render_dashboard(app, f, main_layout[1]),
    }
    render_status(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_title(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== Sharqia Health Dashboard ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let titles = Mode::ALL
        .iter()
        .map(|mode| TextLine::from(format!("{} {}", mode.index() + 1, mode.label())))
        .collect::<Vec<_>>();
    let selected = app.active_mode().unwrap_or(app.initial_mode).index();

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(40, 20, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup).inner(Margin::new(1, 0));
    f.render_widget(block, popup);

    let throbber = Throbber::default()
        .label("Loading datasets...")
        .style(Style::default().fg(Color::White))
        .throbber_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX);
    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, inner, &mut state);
}

fn render_dashboard(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_cards(app.scene.cards(), f, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    render_map(&app.scene, f, right[0]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(right[1]);

    render_chart(
        app.scene.chart(ChartSlot::Comparison),
        " Comparison ",
        f,
        charts[0],
    );
    render_chart(app.scene.chart(ChartSlot::Trend), " Trend ", f, charts[1]);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let color = match app.load_state {
        LoadState::Loading => Color::Cyan,
        LoadState::Ready => Color::Green,
        LoadState::Failed => Color::Red,
    };
    let mut spans = vec![Span::styled(
        app.status_message.clone(),
        Style::default().fg(color),
    )];
    if let Some(name) = app.scene.hovered_feature().map(|feature| feature.name.clone()) {
        spans.push(Span::styled(
            format!("  |  Hovering {name}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    f.render_widget(paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let hint = Paragraph::new(TextLine::from(Span::styled(
        "1/2/3 or ←/→: mode   ↑/↓: select area   Enter: zoom   Esc: reset   ?: help   q: quit",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hint, area);
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let rows = [
        ("1 / 2 / 3", "Sharqia districts, Egypt governorates, world regions"),
        ("← / →", "Previous or next comparison mode"),
        ("↑ / ↓", "Move between districts on the map"),
        ("Enter", "Zoom to the selected district"),
        ("Esc", "Clear the selection and reset the map"),
        ("? / F1", "Toggle this help"),
        ("q", "Quit"),
    ];
    let mut lines = vec![TextLine::from("")];
    for (key, action) in rows {
        lines.push(TextLine::from(vec![
            Span::styled(format!("{key:<12}"), key_style),
            Span::raw(action),
        ]));
    }
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Command line:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for line in crate::cli::CliArgs::help_text().lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }
    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )));
    lines
}
