use std::io::Stdout;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use health_core::{load, DataSource};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::app::{handle_input, App};
use crate::fetch::FileFetcher;
use crate::ui;

/// Configure event poll timeout (ms)
const EVENT_POLL_TIMEOUT: u64 = 50;

/// Run the main application event loop
///
/// Datasets load while the loop keeps drawing, so the spinner turns until
/// the controller takes over.
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    source: &DataSource,
) -> Result<()> {
    info!(base = source.base(), "loading datasets");
    let loading = load(&FileFetcher, source);
    tokio::pin!(loading);
    let mut pending = true;

    while app.running {
        app.tick();

        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| color_eyre::eyre::eyre!("Terminal draw error: {e}"))?;

        let poll_timeout = if pending {
            tokio::select! {
                loaded = &mut loading => {
                    pending = false;
                    app.finish_loading(loaded);
                }
                () = tokio::time::sleep(Duration::from_millis(EVENT_POLL_TIMEOUT)) => {}
            }
            Duration::ZERO
        } else {
            Duration::from_millis(EVENT_POLL_TIMEOUT)
        };

        if matches!(event::poll(poll_timeout), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                }
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Ok(_) | Err(_) => {}
            }
        }
    }
    Ok(())
}
