use chrono::{DateTime, Local};
use health_core::{bootstrap, ComparisonController, Datasets, Mode, Scene};
use throbber_widgets_tui::ThrobberState;
use tracing::info;

/// Where the dataset load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub load_state: LoadState,
    pub scene: Scene,
    pub controller: Option<ComparisonController>,
    pub initial_mode: Mode,
    /// Position in `scene.features()` of the hovered feature
    pub feature_cursor: Option<usize>,
    pub throbber: ThrobberState,
    pub status_message: String,
    pub loaded_at: Option<DateTime<Local>>,
    pub show_help: bool,
}

impl App {
    pub fn new(initial_mode: Mode) -> Self {
        Self {
            running: true,
            load_state: LoadState::Loading,
            scene: Scene::new(),
            controller: None,
            initial_mode,
            feature_cursor: None,
            throbber: ThrobberState::default(),
            status_message: "Loading datasets...".to_string(),
            loaded_at: None,
            show_help: false,
        }
    }

    /// Advances the loading spinner.
    pub fn tick(&mut self) {
        if self.load_state == LoadState::Loading {
            self.throbber.calc_next();
        }
    }

    /// Hands the load result to the controller; on failure the scene
    /// only carries the error message.
    pub fn finish_loading(&mut self, loaded: health_core::Result<Datasets>) {
        self.controller = bootstrap(loaded, self.initial_mode, &mut self.scene);
        if self.controller.is_some() {
            let now = Local::now();
            info!(mode = self.initial_mode.as_str(), "dashboard ready");
            self.load_state = LoadState::Ready;
            self.status_message = format!("Data loaded at {}", now.format("%H:%M:%S"));
            self.loaded_at = Some(now);
        } else {
            self.load_state = LoadState::Failed;
            self.status_message = "Data could not be loaded".to_string();
        }
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.controller
            .as_ref()
            .and_then(ComparisonController::active_mode)
    }

    pub fn select_mode(&mut self, mode: Mode) {
        if let Some(controller) = self.controller.as_mut() {
            controller.select(mode, &mut self.scene);
            self.feature_cursor = None;
            self.status_message = format!("Showing {}", mode.label());
        }
    }

    pub fn cycle_mode(&mut self, forward: bool) {
        if let Some(controller) = self.controller.as_mut() {
            controller.cycle(forward, &mut self.scene);
            self.feature_cursor = None;
            if let Some(mode) = controller.active_mode() {
                self.status_message = format!("Showing {}", mode.label());
            }
        }
    }

    /// Moves the pointer to the next (or previous) map feature.
    pub fn hover_step(&mut self, forward: bool) {
        let features = self.scene.features();
        let count = features.len();
        if count == 0 {
            return;
        }
        let next = match self.feature_cursor {
            None if forward => 0,
            None => count - 1,
            Some(cursor) if forward => (cursor + 1) % count,
            Some(cursor) => (cursor + count - 1) % count,
        };
        let (layer, index, _) = features[next];
        self.scene.hover(layer, index);
        self.feature_cursor = Some(next);
    }

    pub fn click_feature(&mut self) {
        self.scene.click();
    }

    /// Leaves the hovered feature and restores the mode's map view.
    pub fn reset_map(&mut self) {
        self.scene.leave();
        self.scene.reset_view();
        self.feature_cursor = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
