use health_core::{bootstrap, ComparisonController, Datasets, Mode, Scene};
use ratzilla::event::KeyCode;

/// Everything the page draws from, shared between the key handler and
/// the draw callback.
#[derive(Debug)]
pub struct Dashboard {
    pub scene: Scene,
    pub controller: Option<ComparisonController>,
    pub initial_mode: Mode,
    pub loading: bool,
    cursor: Option<usize>,
}

impl Dashboard {
    pub fn new(initial_mode: Mode) -> Self {
        Self {
            scene: Scene::new(),
            controller: None,
            initial_mode,
            loading: true,
            cursor: None,
        }
    }

    pub fn finish_loading(&mut self, loaded: health_core::Result<Datasets>) {
        if let Err(error) = &loaded {
            web_console_error(&error.to_string());
        }
        self.controller = bootstrap(loaded, self.initial_mode, &mut self.scene);
        self.loading = false;
    }

    pub fn active_mode(&self) -> Mode {
        self.controller
            .as_ref()
            .and_then(ComparisonController::active_mode)
            .unwrap_or(self.initial_mode)
    }

    pub fn handle_key(&mut self, code: &KeyCode) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(digit @ '1'..='3') => {
                let index = (*digit as usize) - ('1' as usize);
                if let Some(mode) = Mode::from_index(index) {
                    controller.select(mode, &mut self.scene);
                    self.cursor = None;
                }
            }
            KeyCode::Left => {
                controller.cycle(false, &mut self.scene);
                self.cursor = None;
            }
            KeyCode::Right | KeyCode::Tab => {
                controller.cycle(true, &mut self.scene);
                self.cursor = None;
            }
            KeyCode::Up => self.step(false),
            KeyCode::Down => self.step(true),
            KeyCode::Enter => self.scene.click(),
            KeyCode::Esc => {
                self.scene.leave();
                self.scene.reset_view();
                self.cursor = None;
            }
            _ => {}
        }
    }

    fn step(&mut self, forward: bool) {
        let features = self.scene.features();
        if features.is_empty() {
            return;
        }
        let count = features.len();
        let next = match self.cursor {
            None if forward => 0,
            None => count - 1,
            Some(cursor) if forward => (cursor + 1) % count,
            Some(cursor) => (cursor + count - 1) % count,
        };
        let (layer, index, _) = features[next];
        self.scene.hover(layer, index);
        self.cursor = Some(next);
    }
}

#[cfg(target_arch = "wasm32")]
fn web_console_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn web_console_error(_message: &str) {}

#[cfg(test)]
mod tests {
    use super::*;
    use health_core::dataset::{GeoBoundary, RegionDataset};
    use health_core::view::scene::CardsView;
    use health_core::{DashboardError, Indicator, LoadFailure, Resource};

    fn datasets() -> Datasets {
        Datasets {
            region: RegionDataset::from_json(
                r#"{"districts": ["Zagazig", "Belbeis"],
                    "indicators": {"diabetes": {"values": [18, 12]}}}"#,
                Indicator::Diabetes,
            )
            .unwrap(),
            national: RegionDataset::from_json(
                r#"{"governorates": ["Sharqia"], "indicators": {"infantMortality": {"values": [18]}}}"#,
                Indicator::InfantMortality,
            )
            .unwrap(),
            global: RegionDataset::from_json(
                r#"{"regions": ["Africa"], "indicators": {"lifeExpectancy": {"values": [64]}}}"#,
                Indicator::LifeExpectancy,
            )
            .unwrap(),
            boundaries: GeoBoundary::from_json(
                r#"{"type": "FeatureCollection", "features": [
                    {"type": "Feature", "properties": {"name": "Zagazig"},
                     "geometry": {"type": "Polygon", "coordinates": [[[31.4, 30.5], [31.6, 30.5], [31.6, 30.7], [31.4, 30.5]]]}}
                ]}"#,
            )
            .unwrap(),
        }
    }

    fn ready() -> Dashboard {
        let mut dashboard = Dashboard::new(Mode::Local);
        dashboard.finish_loading(Ok(datasets()));
        dashboard
    }

    #[test]
    fn digits_select_modes() {
        let mut dashboard = ready();
        dashboard.handle_key(&KeyCode::Char('3'));
        assert_eq!(dashboard.active_mode(), Mode::Global);
        dashboard.handle_key(&KeyCode::Char('2'));
        assert_eq!(dashboard.active_mode(), Mode::National);
    }

    #[test]
    fn arrows_wrap_around_modes() {
        let mut dashboard = ready();
        dashboard.handle_key(&KeyCode::Left);
        assert_eq!(dashboard.active_mode(), Mode::Global);
        dashboard.handle_key(&KeyCode::Right);
        assert_eq!(dashboard.active_mode(), Mode::Local);
    }

    #[test]
    fn hover_and_escape() {
        let mut dashboard = ready();
        dashboard.handle_key(&KeyCode::Down);
        assert_eq!(
            dashboard.scene.hovered_feature().map(|f| f.name.as_str()),
            Some("Zagazig")
        );
        dashboard.handle_key(&KeyCode::Esc);
        assert!(dashboard.scene.hovered_feature().is_none());
    }

    #[test]
    fn keys_are_ignored_after_failed_load() {
        let mut dashboard = Dashboard::new(Mode::Local);
        dashboard.finish_loading(Err(DashboardError::data_unavailable(
            Resource::Global,
            LoadFailure::Status(500),
        )));
        dashboard.handle_key(&KeyCode::Char('2'));
        assert!(!dashboard.loading);
        assert!(matches!(dashboard.scene.cards(), CardsView::Error(_)));
        assert_eq!(dashboard.active_mode(), Mode::Local);
    }
}
