use crate::app::state::{App, LoadState};
use crossterm::event::KeyCode;
use health_core::Mode;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') => app.quit(),
        _ if app.load_state != LoadState::Ready => {}
        KeyCode::Char(digit @ '1'..='3') => {
            if let Some(mode) = mode_for_digit(digit) {
                app.select_mode(mode);
            }
        }
        KeyCode::Left => app.cycle_mode(false),
        KeyCode::Right | KeyCode::Tab => app.cycle_mode(true),
        KeyCode::Up => app.hover_step(false),
        KeyCode::Down => app.hover_step(true),
        KeyCode::Enter => app.click_feature(),
        KeyCode::Esc => app.reset_map(),
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || key == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

/// Selector keys `1`, `2` and `3`.
pub fn mode_for_digit(digit: char) -> Option<Mode> {
    let index = digit.to_digit(10)?.checked_sub(1)?;
    Mode::from_index(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::tests::datasets;

    fn ready_app() -> App {
        let mut app = App::new(Mode::Local);
        app.finish_loading(Ok(datasets()));
        app
    }

    #[test]
    fn digits_select_modes() {
        assert_eq!(mode_for_digit('1'), Some(Mode::Local));
        assert_eq!(mode_for_digit('3'), Some(Mode::Global));
        assert_eq!(mode_for_digit('0'), None);
        assert_eq!(mode_for_digit('4'), None);
    }

    #[test]
    fn keys_switch_modes_once_ready() {
        let mut app = ready_app();
        handle_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_mode(), Some(Mode::National));
        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.active_mode(), Some(Mode::Global));
        handle_input(&mut app, KeyCode::Right);
        assert_eq!(app.active_mode(), Some(Mode::Local));
    }

    #[test]
    fn only_quit_works_while_loading() {
        let mut app = App::new(Mode::Local);
        handle_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_mode(), None);
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = ready_app();
        handle_input(&mut app, KeyCode::F(1));
        handle_input(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_mode(), Some(Mode::Local));
        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn enter_zooms_to_hovered_feature() {
        let mut app = ready_app();
        let home = app.scene.view();
        handle_input(&mut app, KeyCode::Down);
        handle_input(&mut app, KeyCode::Enter);
        assert_ne!(app.scene.view(), home);
        handle_input(&mut app, KeyCode::Esc);
        assert_eq!(app.scene.view(), home);
    }
}
