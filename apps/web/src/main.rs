mod draw;
mod fetch;
mod page;
mod state;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use health_core::{load, DataSource, Mode};
use ratzilla::ratatui::{
    layout::Margin,
    style::{Color, Style},
    widgets::{Block, Borders},
    Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use crate::fetch::WebFetch;
use crate::state::Dashboard;

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let (source, initial_mode) = match page::location() {
        Some((pathname, search)) => (
            page::data_source(&pathname),
            page::mode_from_query(&search).unwrap_or_default(),
        ),
        None => (DataSource::relative(), Mode::default()),
    };

    let dashboard = Rc::new(RefCell::new(Dashboard::new(initial_mode)));

    spawn_local({
        let dashboard = dashboard.clone();
        async move {
            let loaded = load(&WebFetch, &source).await;
            dashboard.borrow_mut().finish_loading(loaded);
        }
    });

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = dashboard.clone();
        move |event| dashboard.borrow_mut().handle_key(&event.code)
    });

    terminal.draw_web(move |f| {
        let area = f.area();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 0));
        f.render_widget(block, area);

        draw::render(&dashboard.borrow(), f, inner);
    });

    Ok(())
}
